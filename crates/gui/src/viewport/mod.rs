//! 3D preview viewport with OpenGL rendering

mod gl_renderer;
pub use three_ai_lib::viewport::{camera, mesh};

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::i18n::t;
use crate::state::preview::{FrameRenderer, PreviewScene, PreviewState};
use camera::PerspectiveCamera;
use gl_renderer::{FrameData, GlRenderer};
use mesh::MeshData;

/// Paints a [`PreviewState`] into an egui rect through a glow callback
pub struct PreviewViewport {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
}

impl PreviewViewport {
    pub fn new() -> Self {
        Self { gl_renderer: None }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("Preview renderer unavailable: {e}"),
        }
    }

    /// Release GL objects; the context is about to go away
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    /// Fill the remaining space of `ui` with the preview and advance it one frame.
    /// `generation` changes whenever the preview is rebuilt, which forces a mesh re-upload.
    pub fn show(&mut self, ui: &mut Ui, preview: &mut PreviewState, generation: u64) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        preview.resize(rect.width(), rect.height());

        let painter = ui.painter().clone();
        match self.gl_renderer.clone() {
            Some(renderer) => {
                let mut target = CallbackTarget {
                    painter,
                    rect,
                    renderer,
                    generation,
                };
                preview.animate(&mut target);
            }
            None => preview.animate(&mut Placeholder { painter, rect }),
        }

        // Continuous render loop while the window is open
        ui.ctx().request_repaint();
    }
}

/// Stands in for the GL renderer when no context is available; the animation still advances
struct Placeholder {
    painter: egui::Painter,
    rect: egui::Rect,
}

impl FrameRenderer for Placeholder {
    fn render(&mut self, scene: &PreviewScene, _camera: &PerspectiveCamera) {
        let [r, g, b] = scene.background.map(|c| (c * 255.0).round() as u8);
        self.painter
            .rect_filled(self.rect, 0.0, egui::Color32::from_rgb(r, g, b));
        self.painter.text(
            self.rect.center(),
            egui::Align2::CENTER_CENTER,
            t("preview.no_gl"),
            egui::FontId::proportional(14.0),
            egui::Color32::GRAY,
        );
    }
}

/// One-frame [`FrameRenderer`] that queues an egui paint callback
struct CallbackTarget {
    painter: egui::Painter,
    rect: egui::Rect,
    renderer: Arc<Mutex<GlRenderer>>,
    generation: u64,
}

impl CallbackTarget {
    /// Geometry is only cloned when the GL side holds a stale generation
    fn mesh_to_upload(&self, scene: &PreviewScene) -> Option<Option<MeshData>> {
        let uploaded = self
            .renderer
            .lock()
            .ok()
            .and_then(|r| r.mesh_generation());
        if uploaded == Some(self.generation) {
            return None;
        }
        Some(scene.mesh.as_ref().map(|m| m.geometry.clone()))
    }
}

impl FrameRenderer for CallbackTarget {
    fn render(&mut self, scene: &PreviewScene, camera: &PerspectiveCamera) {
        let frame = FrameData::capture(scene, camera);
        let upload = self.mesh_to_upload(scene);
        let renderer = self.renderer.clone();
        let generation = self.generation;

        let callback = egui::PaintCallback {
            rect: self.rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();
                let clip = info.clip_rect_in_pixels();
                let viewport = [clip.left_px, clip.from_bottom_px, clip.width_px, clip.height_px];

                let Ok(mut renderer) = renderer.lock() else {
                    return;
                };
                if let Some(mesh) = &upload {
                    renderer.sync_mesh(gl, mesh.as_ref(), generation);
                }
                renderer.paint(gl, &frame, viewport);
            })),
        };
        self.painter.add(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_advances_without_gl() {
        let ctx = egui::Context::default();
        let mut viewport = PreviewViewport::new();
        let mut preview = PreviewState::new(640.0, 420.0);

        for _ in 0..3 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    viewport.show(ui, &mut preview, 1);
                });
            });
        }

        assert_eq!(preview.frame_count(), 3);
        let rotation = preview.scene.mesh.as_ref().map(|m| m.rotation.x).unwrap_or_default();
        assert!(rotation > 0.0);
    }
}
