use egui::Ui;

use crate::i18n::t;
use crate::markup::{Block, Inline};
use crate::state::chat::{ChatMessage, ChatRole, ConversationView, SUGGESTIONS};
use crate::state::AppState;

/// Tallest the input box grows before it starts scrolling
const INPUT_MAX_HEIGHT: f32 = 120.0;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let input_reserve = 64.0;
    let scroll_height = (ui.available_height() - input_reserve).max(60.0);

    match state.chat.view {
        ConversationView::Welcome => {
            ui.allocate_ui(egui::vec2(ui.available_width(), scroll_height), |ui| {
                show_welcome(ui, state);
            });
        }
        ConversationView::Messages => {
            let scroll_to_end = state.chat.take_scroll_request();
            egui::ScrollArea::vertical()
                .id_salt("chat_scroll")
                .max_height(scroll_height)
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for msg in &state.chat.messages {
                        show_message(ui, msg);
                    }

                    if state.chat.is_typing() {
                        ui.add_space(4.0);
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.weak(t("chat.typing"));
                        });
                    }

                    if scroll_to_end {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        }
    }

    ui.separator();
    show_input(ui, state);
}

fn show_welcome(ui: &mut Ui, state: &mut AppState) {
    let mut picked = None;

    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.heading(t("chat.welcome_title"));
        ui.add_space(6.0);
        ui.weak(t("chat.welcome_body"));
        ui.add_space(16.0);
        ui.label(t("chat.suggestions"));
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            for suggestion in SUGGESTIONS {
                if ui.button(*suggestion).clicked() {
                    picked = Some(*suggestion);
                }
            }
        });
    });

    if let Some(prompt) = picked {
        state.chat.apply_suggestion(prompt);
    }
}

fn show_input(ui: &mut Ui, state: &mut AppState) {
    let input_id = ui.make_persistent_id("chat_input");
    let loading = state.chat.is_loading();

    let enter_pressed = ui.memory(|m| m.has_focus(input_id)) && ui.input_mut(take_send_key);

    let mut send_clicked = false;
    ui.horizontal(|ui| {
        let available_w = (ui.available_width() - 44.0).max(40.0);
        let input_resp = egui::ScrollArea::vertical()
            .id_salt("chat_input_scroll")
            .max_height(INPUT_MAX_HEIGHT)
            .max_width(available_w)
            .show(ui, |ui| {
                ui.add_enabled(
                    !loading,
                    egui::TextEdit::multiline(&mut state.chat.input)
                        .id(input_id)
                        .hint_text(t("chat.ask"))
                        .desired_rows(1)
                        .desired_width(available_w),
                )
            })
            .inner;

        if state.chat.take_focus_request() {
            input_resp.request_focus();
        }

        send_clicked = ui
            .add_enabled(state.chat.can_send(), egui::Button::new(">>"))
            .on_hover_text(t("chat.send_tip"))
            .clicked();
    });

    if send_clicked || enter_pressed {
        state.chat.send_message();
    }
}

/// Plain Enter sends. Shift+Enter is left for the text edit to insert a newline;
/// `consume_key` alone would also match it because Shift is ignored unless required.
fn take_send_key(input: &mut egui::InputState) -> bool {
    !input.modifiers.shift && input.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
}

fn show_message(ui: &mut Ui, msg: &ChatMessage) {
    let (prefix, color, bg) = if msg.is_error {
        (
            "AI",
            egui::Color32::from_rgb(255, 130, 130),
            egui::Color32::from_rgba_premultiplied(80, 30, 30, 200),
        )
    } else {
        match msg.role {
            ChatRole::User => (
                t("chat.you"),
                egui::Color32::from_rgb(130, 190, 255),
                egui::Color32::from_rgba_premultiplied(0, 60, 102, 200),
            ),
            ChatRole::Assistant => (
                "AI",
                egui::Color32::from_rgb(130, 255, 170),
                egui::Color32::from_rgba_premultiplied(45, 45, 48, 220),
            ),
        }
    };

    egui::Frame::NONE
        .fill(bg)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::same(8))
        .outer_margin(egui::Margin::symmetric(0, 3))
        .show(ui, |ui| {
            ui.colored_label(color, prefix);
            for block in &msg.blocks {
                show_block(ui, block);
            }
        });
}

fn show_block(ui: &mut Ui, block: &Block) {
    match block {
        Block::Paragraph(inlines) => {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for inline in inlines {
                    match inline {
                        Inline::Text(text) => {
                            ui.label(text);
                        }
                        Inline::Code(code) => {
                            ui.code(code);
                        }
                        Inline::LineBreak => ui.end_row(),
                    }
                }
            });
        }
        Block::Code { language, code } => {
            egui::Frame::NONE
                .fill(ui.visuals().extreme_bg_color)
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(6))
                .outer_margin(egui::Margin::symmetric(0, 4))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.weak(language.as_deref().unwrap_or(t("chat.code")));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button(t("chat.copy")).clicked() {
                                ui.ctx().copy_text(code.clone());
                            }
                        });
                    });
                    ui.add(egui::Label::new(egui::RichText::new(code).monospace()).wrap());
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter_with(modifiers: egui::Modifiers) -> egui::InputState {
        let mut input = egui::InputState::default();
        input.modifiers = modifiers;
        input.events.push(egui::Event::Key {
            key: egui::Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        });
        input
    }

    #[test]
    fn test_plain_enter_sends() {
        let mut input = enter_with(egui::Modifiers::NONE);
        assert!(take_send_key(&mut input));
        assert!(input.events.is_empty());
    }

    #[test]
    fn test_shift_enter_is_left_for_newline() {
        let mut input = enter_with(egui::Modifiers::SHIFT);
        assert!(!take_send_key(&mut input));
        assert_eq!(input.events.len(), 1);
    }
}
