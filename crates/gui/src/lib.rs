// Library crate: chat/preview state, backend client and test harness.
// GUI-specific modules (app, ui, GL renderer) remain in the binary crate.

pub mod backend;
pub mod fixtures;
pub mod harness;
pub mod markup;
pub mod state;

/// Camera and mesh data shared by the preview state and the GL renderer.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
}
