//! Headless test harness: the full application state driven without a window.
//!
//! Chat requests go to a [`ScriptedBackend`] on a private tokio runtime, so tests
//! can queue replies, fire UI operations and wait for completions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::fixtures::{RecordedCall, Reply, ScriptedBackend};
use crate::state::chat::{ChatMessage, ChatState};
use crate::state::preview::{FrameRenderer, PreviewScene, PreviewState};
use crate::state::{AppSettings, AppState};
use crate::viewport::camera::PerspectiveCamera;

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Renderer that only counts frames
#[derive(Default)]
pub struct NullRenderer {
    pub frames: u64,
}

impl FrameRenderer for NullRenderer {
    fn render(&mut self, _scene: &PreviewScene, _camera: &PerspectiveCamera) {
        self.frames += 1;
    }
}

/// Headless test harness: app state plus a scripted backend and the runtime requests run on
pub struct TestHarness {
    pub state: AppState,
    pub backend: ScriptedBackend,
    pub renderer: NullRenderer,
    // Dropped last so in-flight tasks outlive the state that spawned them
    _runtime: tokio::runtime::Runtime,
}

impl TestHarness {
    /// Create a harness with default settings and an empty reply queue.
    pub fn new() -> std::io::Result<Self> {
        Self::with_settings(AppSettings::default())
    }

    pub fn with_settings(settings: AppSettings) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let backend = ScriptedBackend::default();
        let chat = ChatState::new(
            Arc::new(backend.clone()),
            runtime.handle().clone(),
            settings.chat.default_context.clone(),
        );
        Ok(Self {
            state: AppState::new(chat, settings),
            backend,
            renderer: NullRenderer::default(),
            _runtime: runtime,
        })
    }

    // ── Backend script ────────────────────────────────────────

    /// Queue a 2xx reply with this body
    pub fn reply(&mut self, body: Value) -> &mut Self {
        self.backend.push(Reply::Json(body));
        self
    }

    /// Queue a non-2xx reply
    pub fn reply_status(&mut self, code: u16) -> &mut Self {
        self.backend.push(Reply::status(code));
        self
    }

    /// Queue a reply that never arrives
    pub fn reply_hang(&mut self) -> &mut Self {
        self.backend.push(Reply::Hang);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.backend.calls()
    }

    /// Wait until the backend has seen `n` calls.
    /// Requests reach the backend from a runtime task, not from the operation itself.
    pub fn wait_for_calls(&self, n: usize) -> bool {
        let deadline = Instant::now() + RESPONSE_TIMEOUT;
        while self.backend.call_count() < n {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        true
    }

    // ── Chat ──────────────────────────────────────────────────

    pub fn chat(&mut self) -> &mut ChatState {
        &mut self.state.chat
    }

    pub fn type_input(&mut self, text: &str) -> &mut Self {
        self.state.chat.input = text.to_string();
        self
    }

    /// Wait for the in-flight request to resolve. Returns true if it did.
    pub fn settle(&mut self) -> bool {
        self.state.chat.wait_for_response(RESPONSE_TIMEOUT)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.state.chat.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.state.chat.messages.last()
    }

    pub fn is_loading(&self) -> bool {
        self.state.chat.is_loading()
    }

    // ── Preview ───────────────────────────────────────────────

    pub fn open_preview(&mut self) -> &mut Self {
        self.state.open_preview();
        self
    }

    pub fn preview(&mut self) -> Option<&mut PreviewState> {
        self.state.preview.as_mut()
    }

    /// Run `n` frames of the render loop (no-op when the preview is closed)
    pub fn run_frames(&mut self, n: usize) {
        if let Some(preview) = self.state.preview.as_mut() {
            for _ in 0..n {
                preview.animate(&mut self.renderer);
            }
        }
    }
}
