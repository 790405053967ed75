//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;

/// Handle global keyboard shortcuts.
/// Enter/Shift+Enter in the chat input are handled by the chat panel.
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    let (escape, new_chat) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.modifiers.command && i.key_pressed(egui::Key::N),
        )
    });

    // Escape: close the topmost window
    if escape {
        state.close_top_window();
    }
    // Ctrl+N: new chat
    if new_chat {
        state.chat.new_chat();
    }
}
