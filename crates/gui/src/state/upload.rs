use std::path::{Path, PathBuf};

/// Model upload window: drop zone + file picker
#[derive(Default)]
pub struct UploadState {
    pub open: bool,
    /// Files are being dragged over the window
    pub drag_hover: bool,
    /// Last file handed to [`UploadState::handle_file_upload`]
    pub last_file: Option<PathBuf>,
}

impl UploadState {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.drag_hover = false;
    }

    /// Upload is not implemented; the file is only logged.
    pub fn handle_file_upload(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!("Uploading file: {name}");
        self.drag_hover = false;
        self.last_file = Some(path.to_path_buf());
    }
}
