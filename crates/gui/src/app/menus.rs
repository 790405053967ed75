//! Application menu bar and settings window

use std::sync::Arc;

use eframe::egui;

use crate::backend::HttpBackend;
use crate::i18n::{lang, set_lang, t};
use crate::state::{AppState, Language};

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.new_chat")).clicked() {
            state.chat.new_chat();
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.view"), |ui| {
        let mut sidebar = state.panels.sidebar;
        if ui.checkbox(&mut sidebar, t("menu.sidebar")).changed() {
            state.toggle_sidebar();
        }
        ui.separator();
        if ui.button(t("menu.preview")).clicked() {
            state.open_preview();
            ui.close_menu();
        }
        if ui.button(t("menu.upload")).clicked() {
            state.upload.open();
            ui.close_menu();
        }
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        ui.menu_button(t("menu.language"), |ui| {
            for (l, name) in [(Language::En, "English"), (Language::Ru, "Русский")] {
                if ui.radio(lang() == l, name).clicked() {
                    set_lang(l);
                    state.settings.ui.language = l;
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Preferences window: backend address, font size, preview speed
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_settings_window {
        return;
    }

    let mut open = true;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(t("settings.backend"));
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut state.settings.backend.base_url)
                                .desired_width(280.0),
                        );
                        if ui.button(t("settings.apply")).clicked() {
                            let backend = HttpBackend::new(&state.settings.backend.base_url);
                            tracing::info!("Switching backend to {}", backend.base_url());
                            state.chat.set_backend(Arc::new(backend));
                        }
                    });
                    ui.end_row();

                    ui.label(t("settings.font_size"));
                    ui.add(egui::Slider::new(&mut state.settings.ui.font_size, 10.0..=22.0));
                    ui.end_row();

                    ui.label(t("settings.rotation_step"));
                    ui.add(
                        egui::Slider::new(&mut state.settings.preview.rotation_step, 0.0..=0.1)
                            .step_by(0.005),
                    );
                    ui.end_row();
                });

            ui.add_space(6.0);
            if ui.button(t("settings.save")).clicked() {
                state.settings.save();
            }
        });

    if !open {
        state.show_settings_window = false;
    }
}
