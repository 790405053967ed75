//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::time::Duration;

use eframe::egui;

use crate::i18n::set_lang;
use crate::state::AppState;
use crate::ui::{chat_panel, preview_window, sidebar, upload_window};
use crate::viewport::PreviewViewport;

/// How often to poll for a pending backend response while idle
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application
pub struct ThreeAiApp {
    state: AppState,
    viewport: PreviewViewport,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
    // Backend requests run here; kept alive for the app's lifetime
    _runtime: tokio::runtime::Runtime,
}

impl ThreeAiApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: AppState,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        set_lang(state.settings.ui.language);
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        let mut viewport = PreviewViewport::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            last_font_size,
            _runtime: runtime,
        }
    }
}

impl eframe::App for ThreeAiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        if self.state.chat.poll_responses() {
            ctx.request_repaint();
        }
        if self.state.chat.is_loading() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Left panel: new chat, tools, quick actions ──────
        if self.state.panels.sidebar {
            egui::SidePanel::left("sidebar")
                .default_width(230.0)
                .width_range(180.0..=360.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)),
                )
                .show(ctx, |ui| {
                    sidebar::show(ui, &mut self.state);
                });
        }

        // ── Central panel: chat ──────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            chat_panel::show(ui, &mut self.state);
        });

        // ── Floating windows ─────────────────────────────────
        upload_window::show(ctx, &mut self.state);
        preview_window::show(ctx, &mut self.state, &mut self.viewport);
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}
