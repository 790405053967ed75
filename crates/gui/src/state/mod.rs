pub mod chat;
pub mod preview;
pub mod settings;
pub mod upload;

use chat::ChatState;
use preview::PreviewState;
pub use settings::{AppSettings, Language};
use upload::UploadState;

/// Preview size used until the window reports its real size
pub const DEFAULT_PREVIEW_SIZE: [f32; 2] = [640.0, 420.0];

/// Panel visibility flags
pub struct PanelVisibility {
    pub sidebar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self { sidebar: true }
    }
}

/// Combined application state
pub struct AppState {
    pub chat: ChatState,
    /// Present only while the preview window is open
    pub preview: Option<PreviewState>,
    pub upload: UploadState,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
    /// Bumped on every preview open so renderers can drop stale GPU data
    preview_generation: u64,
}

impl AppState {
    pub fn new(chat: ChatState, settings: AppSettings) -> Self {
        Self {
            chat,
            preview: None,
            upload: UploadState::default(),
            panels: PanelVisibility::default(),
            settings,
            show_settings_window: false,
            preview_generation: 0,
        }
    }

    /// Open the preview window with a freshly built scene
    pub fn open_preview(&mut self) {
        let [w, h] = self
            .preview
            .as_ref()
            .map_or(DEFAULT_PREVIEW_SIZE, |p| p.size());
        self.preview = Some(PreviewState::with_rotation_step(
            w,
            h,
            self.settings.preview.rotation_step,
        ));
        self.preview_generation += 1;
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    pub fn toggle_sidebar(&mut self) {
        self.panels.sidebar = !self.panels.sidebar;
    }

    /// Close the topmost open window. Returns false if nothing was open.
    pub fn close_top_window(&mut self) -> bool {
        if self.show_settings_window {
            self.show_settings_window = false;
        } else if self.upload.open {
            self.upload.close();
        } else if self.preview.is_some() {
            self.close_preview();
        } else {
            return false;
        }
        true
    }
}
