//! 3D preview: one spinning mesh, two lights and a perspective camera.
//!
//! The state is rebuilt every time the preview window opens. Rendering goes
//! through [`FrameRenderer`], so the GL backend stays in the binary.

use glam::{EulerRot, Mat4, Vec3};

use crate::viewport::camera::PerspectiveCamera;
use crate::viewport::mesh::{self, MeshData};

/// Rotation added to the mesh's x and y angles per frame (radians)
pub const DEFAULT_ROTATION_STEP: f32 = 0.01;

const BACKGROUND: u32 = 0x1e1e1e;
const CAMERA_FOV: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
const CAMERA_HOME: Vec3 = Vec3::new(0.0, 0.0, 5.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    pub color: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

#[derive(Debug, Clone)]
pub struct PreviewMesh {
    pub geometry: MeshData,
    pub material: PhongMaterial,
    /// Euler angles (radians), applied in XYZ order
    pub rotation: Vec3,
}

impl PreviewMesh {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

#[derive(Debug, Clone)]
pub struct PreviewScene {
    pub background: [f32; 3],
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub mesh: Option<PreviewMesh>,
}

/// Default cube: 1x1x1, Phong blue
pub fn default_cube() -> PreviewMesh {
    let color = mesh::rgb(0x007acc);
    PreviewMesh {
        geometry: mesh::cube(1.0, 1.0, 1.0, color),
        material: PhongMaterial {
            color,
            specular: mesh::rgb(0x555555),
            shininess: 30.0,
        },
        rotation: Vec3::ZERO,
    }
}

/// Draws one frame of the preview
pub trait FrameRenderer {
    fn render(&mut self, scene: &PreviewScene, camera: &PerspectiveCamera);
}

/// Preview window state
pub struct PreviewState {
    pub scene: PreviewScene,
    pub camera: PerspectiveCamera,
    /// Renderer size in logical pixels [width, height]
    size: [f32; 2],
    is_rotating: bool,
    rotation_step: f32,
    frames: u64,
}

impl PreviewState {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_rotation_step(width, height, DEFAULT_ROTATION_STEP)
    }

    pub fn with_rotation_step(width: f32, height: f32, rotation_step: f32) -> Self {
        let aspect = if height > 0.0 { width / height } else { 1.0 };
        let mut camera = PerspectiveCamera::new(CAMERA_FOV, aspect, CAMERA_NEAR, CAMERA_FAR);
        camera.position = CAMERA_HOME;
        camera.look_at(0.0, 0.0, 0.0);

        let scene = PreviewScene {
            background: mesh::rgb(BACKGROUND),
            ambient: AmbientLight {
                color: mesh::rgb(0x404040),
            },
            directional: DirectionalLight {
                color: mesh::rgb(0xffffff),
                intensity: 1.0,
                position: Vec3::new(1.0, 1.0, 1.0),
            },
            mesh: Some(default_cube()),
        };

        tracing::debug!("Preview initialized at {width}x{height}");
        Self {
            scene,
            camera,
            size: [width, height],
            is_rotating: true,
            rotation_step,
            frames: 0,
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    pub fn size(&self) -> [f32; 2] {
        self.size
    }

    /// Frames rendered since the preview was opened
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Advance the animation by one frame without rendering
    pub fn step(&mut self) {
        if !self.is_rotating {
            return;
        }
        if let Some(mesh) = self.scene.mesh.as_mut() {
            mesh.rotation.x += self.rotation_step;
            mesh.rotation.y += self.rotation_step;
        }
    }

    /// One tick of the render loop: advance, then draw
    pub fn animate(&mut self, renderer: &mut dyn FrameRenderer) {
        self.step();
        renderer.render(&self.scene, &self.camera);
        self.frames += 1;
    }

    /// Container changed size. Zero-sized containers are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 || self.size == [width, height] {
            return;
        }
        self.camera.set_aspect(width / height);
        self.size = [width, height];
    }

    pub fn toggle_rotation(&mut self) {
        self.is_rotating = !self.is_rotating;
    }

    /// Zero mesh rotation and put the camera back at its initial pose
    pub fn reset_view(&mut self) {
        if let Some(mesh) = self.scene.mesh.as_mut() {
            mesh.rotation.x = 0.0;
            mesh.rotation.y = 0.0;
        }
        self.camera.position = CAMERA_HOME;
        self.camera.look_at(0.0, 0.0, 0.0);
    }

    /// Not implemented: only logs what was handed in.
    pub fn load_model(&mut self, data: &[u8]) {
        tracing::info!("Loading model: {} bytes (model loading is not implemented)", data.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingRenderer {
        frames: Vec<Vec3>,
    }

    impl FrameRenderer for CountingRenderer {
        fn render(&mut self, scene: &PreviewScene, _camera: &PerspectiveCamera) {
            self.frames.push(scene.mesh.as_ref().map_or(Vec3::ZERO, |m| m.rotation));
        }
    }

    fn rotation(p: &PreviewState) -> Vec3 {
        p.scene.mesh.as_ref().unwrap().rotation
    }

    #[test]
    fn test_initial_scene() {
        let p = PreviewState::new(800.0, 600.0);
        assert!(p.is_rotating());
        assert_eq!(p.camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(p.camera.target, Vec3::ZERO);
        assert_eq!(p.camera.fov, 75.0);
        assert!((p.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(p.scene.directional.intensity, 1.0);
        assert_eq!(p.scene.directional.position, Vec3::ONE);

        let mesh = p.scene.mesh.as_ref().unwrap();
        assert_eq!(mesh.rotation, Vec3::ZERO);
        assert_eq!(mesh.material.shininess, 30.0);
        assert_eq!(mesh.geometry.vertex_count(), 24);
    }

    #[test]
    fn test_animate_rotates_and_renders() {
        let mut p = PreviewState::new(100.0, 100.0);
        let mut r = CountingRenderer::default();
        p.animate(&mut r);
        p.animate(&mut r);

        assert_eq!(r.frames.len(), 2);
        assert_eq!(p.frame_count(), 2);
        let rot = rotation(&p);
        assert!((rot.x - 0.02).abs() < 1e-6);
        assert!((rot.y - 0.02).abs() < 1e-6);
        assert_eq!(rot.z, 0.0);
    }

    #[test]
    fn test_paused_still_renders() {
        let mut p = PreviewState::new(100.0, 100.0);
        p.toggle_rotation();
        let mut r = CountingRenderer::default();
        p.animate(&mut r);
        assert_eq!(r.frames.len(), 1);
        assert_eq!(rotation(&p), Vec3::ZERO);
    }

    #[test]
    fn test_double_toggle_keeps_rate() {
        let mut p = PreviewState::new(100.0, 100.0);
        p.step();
        let first = rotation(&p);

        p.toggle_rotation();
        assert!(!p.is_rotating());
        p.toggle_rotation();
        assert!(p.is_rotating());

        p.step();
        let delta = rotation(&p) - first;
        assert!((delta.x - first.x).abs() < 1e-6);
        assert!((delta.y - first.y).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut p = PreviewState::new(400.0, 400.0);
        p.resize(800.0, 400.0);
        assert_eq!(p.size(), [800.0, 400.0]);
        assert!((p.camera.aspect - 2.0).abs() < 1e-6);

        p.resize(800.0, 0.0);
        assert_eq!(p.size(), [800.0, 400.0]);
        assert!((p.camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_start_uses_square_aspect() {
        let p = PreviewState::new(300.0, 0.0);
        assert_eq!(p.camera.aspect, 1.0);
    }

    #[test]
    fn test_reset_view() {
        let mut p = PreviewState::new(100.0, 100.0);
        for _ in 0..10 {
            p.step();
        }
        p.camera.set_position(3.0, 2.0, 1.0);
        p.camera.look_at(1.0, 1.0, 1.0);

        p.reset_view();
        assert_eq!(rotation(&p), Vec3::ZERO);
        assert_eq!(p.camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(p.camera.target, Vec3::ZERO);
        // Reset does not change the rotation flag
        assert!(p.is_rotating());
    }

    #[test]
    fn test_model_matrix_identity_at_rest() {
        let mesh = default_cube();
        assert!(mesh.model_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_load_model_is_inert() {
        let mut p = PreviewState::new(100.0, 100.0);
        p.load_model(b"glTF");
        assert_eq!(p.scene.mesh.as_ref().unwrap().geometry.vertex_count(), 24);
    }
}
