use egui::Ui;

use crate::i18n::t;
use crate::state::chat::QUICK_ACTIONS;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let busy = state.chat.is_loading();

    if ui
        .add_sized([ui.available_width(), 28.0], egui::Button::new(t("sidebar.new_chat")))
        .clicked()
    {
        state.chat.new_chat();
    }

    ui.add_space(8.0);
    ui.label(t("sidebar.context"));
    egui::ComboBox::from_id_salt("chat_context")
        .selected_text(state.chat.context.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for ctx in &state.settings.chat.contexts {
                ui.selectable_value(&mut state.chat.context, ctx.clone(), ctx.as_str());
            }
        });

    ui.add_space(8.0);
    ui.separator();
    ui.strong(t("sidebar.tools"));

    let full = [ui.available_width(), 24.0];
    if ui.add_sized(full, egui::Button::new(t("action.upload"))).clicked() {
        state.upload.open();
    }
    if ui
        .add_enabled_ui(!busy, |ui| ui.add_sized(full, egui::Button::new(t("action.generate"))))
        .inner
        .clicked()
    {
        state.chat.generate_code();
    }
    if ui
        .add_enabled_ui(!busy, |ui| ui.add_sized(full, egui::Button::new(t("action.optimize"))))
        .inner
        .clicked()
    {
        state.chat.optimize_code();
    }
    if ui
        .add_enabled_ui(!busy, |ui| ui.add_sized(full, egui::Button::new(t("action.analyze"))))
        .inner
        .clicked()
    {
        state.chat.analyze_performance();
    }
    if ui.add_sized(full, egui::Button::new(t("action.preview"))).clicked() {
        state.open_preview();
    }

    ui.add_space(8.0);
    ui.separator();
    ui.strong(t("sidebar.quick_actions"));

    let mut picked = None;
    for action in QUICK_ACTIONS {
        let resp = ui
            .add_enabled_ui(!busy, |ui| ui.add_sized(full, egui::Button::new(t(action.label))))
            .inner
            .on_hover_text(action.prompt);
        if resp.clicked() {
            picked = Some(action.prompt);
        }
    }
    if let Some(prompt) = picked {
        state.chat.run_quick_action(prompt);
    }
}
