use crate::i18n::t;
use crate::state::{AppState, DEFAULT_PREVIEW_SIZE};
use crate::viewport::PreviewViewport;

/// Floating 3D preview window. Closing it drops the preview scene.
pub fn show(ctx: &egui::Context, state: &mut AppState, viewport: &mut PreviewViewport) {
    let generation = state.preview_generation();
    let Some(preview) = state.preview.as_mut() else {
        return;
    };

    let mut open = true;
    egui::Window::new(t("preview.title"))
        .id(egui::Id::new("preview_window"))
        .open(&mut open)
        .default_size(DEFAULT_PREVIEW_SIZE)
        .min_size([200.0, 150.0])
        .resizable(true)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if preview.is_rotating() {
                    t("preview.pause")
                } else {
                    t("preview.rotate")
                };
                if ui.button(label).clicked() {
                    preview.toggle_rotation();
                }
                if ui.button(t("preview.reset")).clicked() {
                    preview.reset_view();
                }
            });
            ui.separator();
            viewport.show(ui, preview, generation);
        });

    if !open {
        state.close_preview();
    }
}
