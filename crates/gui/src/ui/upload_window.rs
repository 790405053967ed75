use std::path::PathBuf;

use crate::i18n::t;
use crate::state::AppState;

const MODEL_EXTENSIONS: &[&str] = &["gltf", "glb", "obj", "fbx"];

/// Model upload window: drop zone plus a native file picker
pub fn show(ctx: &egui::Context, state: &mut AppState) {
    if !state.upload.open {
        return;
    }

    let (hovering, dropped) = ctx.input(|i| {
        let dropped: Vec<PathBuf> = i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect();
        (!i.raw.hovered_files.is_empty(), dropped)
    });
    state.upload.drag_hover = hovering;
    for path in &dropped {
        state.upload.handle_file_upload(path);
    }

    let mut open = true;
    egui::Window::new(t("upload.title"))
        .id(egui::Id::new("upload_window"))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let stroke_color = if state.upload.drag_hover {
                ui.visuals().selection.bg_fill
            } else {
                ui.visuals().widgets.inactive.bg_stroke.color
            };

            egui::Frame::NONE
                .stroke(egui::Stroke::new(2.0, stroke_color))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(24))
                .show(ui, |ui| {
                    ui.set_min_width(320.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(t("upload.drop_hint"));
                        ui.weak(t("upload.formats"));
                        ui.add_space(10.0);
                        if ui.button(t("upload.browse")).clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .set_title(t("upload.title"))
                                .add_filter("3D", MODEL_EXTENSIONS)
                                .pick_file()
                            {
                                state.upload.handle_file_upload(&path);
                            }
                        }
                    });
                });

            if let Some(last) = &state.upload.last_file {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.weak(t("upload.last"));
                    ui.label(last.display().to_string());
                });
            }
        });

    if !open {
        state.upload.close();
    }
}
