use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::{ApiRequest, ChatRequest, GenerateCodeRequest, OptimizeRequest};
use tokio::runtime::Handle;

use crate::backend::{self, Backend, BackendError};
use crate::markup::{self, Block};

pub const DEFAULT_CODE_PROMPT: &str = "Generate a basic Three.js scene with a rotating cube";
pub const DEFAULT_ANALYSIS_PROMPT: &str = "Analyze Three.js performance best practices";
pub const NOTHING_TO_OPTIMIZE: &str = "Please generate some code first that I can optimize.";

/// Context tag used for performance analysis regardless of the selector
const ANALYSIS_CONTEXT: &str = "threejs";

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Display markup, rendered once when the message is appended
    pub blocks: Vec<Block>,
    pub is_error: bool,
    /// Local hint from the client itself, not a backend answer
    pub is_notice: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, text: String, is_error: bool) -> Self {
        let blocks = markup::render(&text);
        Self {
            role,
            text,
            blocks,
            is_error,
            is_notice: false,
        }
    }

    fn notice(text: &str) -> Self {
        Self {
            is_notice: true,
            ..Self::new(ChatRole::Assistant, text.to_string(), false)
        }
    }
}

/// What the transcript area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationView {
    #[default]
    Welcome,
    Messages,
}

/// Kind of backend operation; picks the failure text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOp {
    Chat,
    GenerateCode,
    Optimize,
    Analyze,
}

impl ChatOp {
    pub fn error_message(self) -> &'static str {
        match self {
            ChatOp::Chat => "Sorry, I encountered an error. Please try again.",
            ChatOp::GenerateCode => "Sorry, I encountered an error generating code.",
            ChatOp::Optimize => "Sorry, I encountered an error optimizing the code.",
            ChatOp::Analyze => "Sorry, I encountered an error during analysis.",
        }
    }
}

/// Preset prompt shown as a quick action
#[derive(Debug, Clone, Copy)]
pub struct QuickAction {
    /// i18n key of the button label
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "qa.rotating_cube",
        prompt: "Create a Three.js scene with a rotating cube and basic lighting",
    },
    QuickAction {
        label: "qa.orbit_controls",
        prompt: "How do I add OrbitControls to my Three.js scene?",
    },
    QuickAction {
        label: "qa.load_gltf",
        prompt: "Show me how to load a GLTF model with GLTFLoader",
    },
    QuickAction {
        label: "qa.particles",
        prompt: "Create a particle system with BufferGeometry and PointsMaterial",
    },
];

/// Suggestion tags on the welcome screen (fill the input, don't send)
pub const SUGGESTIONS: &[&str] = &[
    "Add shadows to my scene",
    "Explain PBR materials",
    "Animate a camera along a path",
    "Post-processing bloom effect",
];

struct PendingRequest {
    token: u64,
    op: ChatOp,
    /// Left behind by "new chat": still blocks new requests, its reply is discarded
    abandoned: bool,
}

struct Completion {
    token: u64,
    result: Result<String, BackendError>,
}

/// Chat transcript plus the single in-flight backend request
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// Context tag sent with plain chat messages
    pub context: String,
    pub view: ConversationView,
    typing: bool,
    pending: Option<PendingRequest>,
    next_token: u64,
    scroll_requested: bool,
    focus_requested: bool,
    backend: Arc<dyn Backend>,
    runtime: Handle,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl ChatState {
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle, context: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            messages: Vec::new(),
            input: String::new(),
            context: context.into(),
            view: ConversationView::Welcome,
            typing: false,
            pending: None,
            next_token: 0,
            scroll_requested: false,
            focus_requested: false,
            backend,
            runtime,
            tx,
            rx,
        }
    }

    pub fn set_backend(&mut self, backend: Arc<dyn Backend>) {
        self.backend = backend;
    }

    /// A request is in flight; input is disabled
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn can_send(&self) -> bool {
        !self.is_loading() && !self.input.trim().is_empty()
    }

    // ── Operations ────────────────────────────────────────────

    /// Send the input as a chat message with the selected context
    pub fn send_message(&mut self) {
        let message = self.input.trim().to_string();
        if message.is_empty() || self.is_loading() {
            return;
        }

        self.show_messages();
        self.add_message(ChatRole::User, message.clone());
        self.input.clear();

        let request = ChatRequest {
            message,
            context: self.context.clone(),
        };
        self.dispatch(ChatOp::Chat, request, |resp| resp.response);
    }

    /// Ask the backend for a Three.js scene built from the input (or a default prompt)
    pub fn generate_code(&mut self) {
        if self.is_loading() {
            return;
        }
        let prompt = self.take_prompt_or(DEFAULT_CODE_PROMPT);

        self.show_messages();
        self.add_message(ChatRole::User, format!("Generate code: {prompt}"));

        self.dispatch(
            ChatOp::GenerateCode,
            GenerateCodeRequest::threejs_scene(prompt),
            |resp| format!("Here's your Three.js code:\n\n```javascript\n{}\n```", resp.code),
        );
    }

    /// Send the most recent AI answer back for optimization
    pub fn optimize_code(&mut self) {
        if self.is_loading() {
            return;
        }
        let Some(code) = self.last_ai_message().map(str::to_string) else {
            self.show_messages();
            self.messages.push(ChatMessage::notice(NOTHING_TO_OPTIMIZE));
            self.scroll_requested = true;
            return;
        };

        self.dispatch(ChatOp::Optimize, OptimizeRequest::performance(code), |resp| {
            format!(
                "Optimized code:\n\n```javascript\n{}\n```\n\n**Improvements:**\n{}",
                resp.optimized_code, resp.explanation
            )
        });
    }

    /// Performance-analysis flavored chat request
    pub fn analyze_performance(&mut self) {
        if self.is_loading() {
            return;
        }
        let prompt = self.take_prompt_or(DEFAULT_ANALYSIS_PROMPT);
        let message = format!("Performance analysis: {prompt}");

        self.show_messages();
        self.add_message(ChatRole::User, message.clone());

        let request = ChatRequest {
            message,
            context: ANALYSIS_CONTEXT.to_string(),
        };
        self.dispatch(ChatOp::Analyze, request, |resp| resp.response);
    }

    /// Fill the input with a preset prompt and send it
    pub fn run_quick_action(&mut self, prompt: &str) {
        if self.is_loading() {
            return;
        }
        self.input = prompt.to_string();
        self.send_message();
    }

    /// Fill the input with a suggestion without sending
    pub fn apply_suggestion(&mut self, prompt: &str) {
        self.input = prompt.to_string();
        self.focus_requested = true;
    }

    /// Clear the transcript and go back to the welcome view.
    /// A request still in flight keeps the chat loading until it resolves,
    /// but its reply never reaches the new transcript.
    pub fn new_chat(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.abandoned = true;
            tracing::info!("Abandoning request #{} on new chat", pending.token);
        }
        self.messages.clear();
        self.input.clear();
        self.typing = false;
        self.view = ConversationView::Welcome;
    }

    /// Most recent assistant answer, skipping errors and client notices
    pub fn last_ai_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant && !m.is_error && !m.is_notice)
            .map(|m| m.text.as_str())
    }

    // ── Completion handling ───────────────────────────────────

    /// Apply finished requests. Returns true if the transcript changed.
    pub fn poll_responses(&mut self) -> bool {
        let mut changed = false;
        while let Ok(done) = self.rx.try_recv() {
            changed |= self.complete(done);
        }
        changed
    }

    /// Block until the pending request resolves or `timeout` elapses.
    /// Returns true if a response (or error) was applied.
    pub fn wait_for_response(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    if self.complete(done) {
                        return true;
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        false
    }

    fn complete(&mut self, done: Completion) -> bool {
        if self.pending.as_ref().map(|p| p.token) != Some(done.token) {
            tracing::debug!("Dropping stale response for request #{}", done.token);
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        self.typing = false;
        self.focus_requested = true;
        if pending.abandoned {
            tracing::debug!("Discarding reply to abandoned request #{}", pending.token);
            return true;
        }
        match done.result {
            Ok(text) => self.add_message(ChatRole::Assistant, text),
            Err(e) => {
                tracing::error!("Request #{} ({:?}) failed: {e}", pending.token, pending.op);
                self.add_error(pending.op.error_message());
            }
        }
        true
    }

    fn dispatch<R>(&mut self, op: ChatOp, request: R, format: fn(R::Response) -> String)
    where
        R: ApiRequest,
    {
        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(PendingRequest {
            token,
            op,
            abandoned: false,
        });
        self.typing = true;
        self.scroll_requested = true;

        let client = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tracing::debug!("Dispatching request #{token} ({op:?}) to {}", R::PATH);
        self.runtime.spawn(async move {
            let result = backend::call(client.as_ref(), &request).await.map(format);
            // Receiver is gone only when the chat state was dropped
            let _ = tx.send(Completion { token, result });
        });
    }

    // ── Transcript view ───────────────────────────────────────

    fn add_message(&mut self, role: ChatRole, text: String) {
        self.messages.push(ChatMessage::new(role, text, false));
        self.scroll_requested = true;
    }

    fn add_error(&mut self, text: &str) {
        self.messages
            .push(ChatMessage::new(ChatRole::Assistant, text.to_string(), true));
        self.scroll_requested = true;
    }

    fn show_messages(&mut self) {
        self.view = ConversationView::Messages;
    }

    fn take_prompt_or(&mut self, default: &str) -> String {
        let trimmed = self.input.trim();
        let prompt = if trimmed.is_empty() { default } else { trimmed }.to_string();
        self.input.clear();
        prompt
    }

    /// Consume a pending "scroll to newest" request
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Consume a pending "focus the input" request
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Reply, ScriptedBackend};
    use crate::markup::code_blocks;
    use serde_json::json;

    const WAIT: Duration = Duration::from_secs(5);

    fn setup(replies: Vec<Reply>) -> (tokio::runtime::Runtime, ScriptedBackend, ChatState) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let backend = ScriptedBackend::new(replies);
        let chat = ChatState::new(Arc::new(backend.clone()), rt.handle().clone(), "threejs");
        (rt, backend, chat)
    }

    #[test]
    fn test_send_message_roundtrip() {
        let (_rt, backend, mut chat) = setup(vec![Reply::json(json!({ "response": "Hi!" }))]);
        chat.input = "  hello  ".to_string();
        chat.send_message();

        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].role, ChatRole::User);
        assert_eq!(chat.messages[0].text, "hello");
        assert!(chat.input.is_empty());
        assert!(chat.is_loading());
        assert!(chat.is_typing());
        assert_eq!(chat.view, ConversationView::Messages);

        assert!(chat.wait_for_response(WAIT));
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[1].role, ChatRole::Assistant);
        assert_eq!(chat.messages[1].text, "Hi!");
        assert!(!chat.is_loading());
        assert!(!chat.is_typing());

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].endpoint, "/api/chat");
        assert_eq!(calls[0].payload, json!({ "message": "hello", "context": "threejs" }));
    }

    #[test]
    fn test_send_empty_is_noop() {
        let (_rt, backend, mut chat) = setup(vec![]);
        chat.input = "   \n ".to_string();
        chat.send_message();
        assert!(chat.messages.is_empty());
        assert!(!chat.is_loading());
        assert_eq!(chat.view, ConversationView::Welcome);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_send_while_loading_is_noop() {
        let (_rt, backend, mut chat) = setup(vec![Reply::Hang]);
        chat.input = "first".to_string();
        chat.send_message();
        chat.input = "second".to_string();
        chat.send_message();
        chat.generate_code();
        chat.analyze_performance();
        chat.optimize_code();

        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.input, "second");
        let deadline = Instant::now() + WAIT;
        while backend.call_count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_generate_code_formats_fenced_block() {
        let (_rt, backend, mut chat) = setup(vec![Reply::json(json!({ "code": "const x=1;" }))]);
        chat.input = "hi".to_string();
        chat.generate_code();
        assert_eq!(chat.messages[0].text, "Generate code: hi");

        assert!(chat.wait_for_response(WAIT));
        let reply = &chat.messages[1];
        assert_eq!(reply.text, "Here's your Three.js code:\n\n```javascript\nconst x=1;\n```");
        let codes: Vec<_> = code_blocks(&reply.blocks).collect();
        assert_eq!(codes, vec![(Some("javascript"), "const x=1;")]);

        let calls = backend.calls();
        assert_eq!(calls[0].endpoint, "/api/generate-code");
        assert_eq!(
            calls[0].payload,
            json!({ "prompt": "hi", "type": "threejs-scene", "complexity": "intermediate" })
        );
    }

    #[test]
    fn test_generate_code_default_prompt() {
        let (_rt, backend, mut chat) = setup(vec![Reply::json(json!({ "code": "" }))]);
        chat.generate_code();
        assert_eq!(chat.messages[0].text, format!("Generate code: {DEFAULT_CODE_PROMPT}"));
        chat.wait_for_response(WAIT);
        assert_eq!(backend.calls()[0].payload["prompt"], DEFAULT_CODE_PROMPT);
    }

    #[test]
    fn test_optimize_without_ai_message() {
        let (_rt, backend, mut chat) = setup(vec![]);
        chat.optimize_code();
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].role, ChatRole::Assistant);
        assert_eq!(chat.messages[0].text, NOTHING_TO_OPTIMIZE);
        assert!(!chat.is_loading());
        assert_eq!(backend.call_count(), 0);

        // The notice itself is never offered for optimization
        chat.optimize_code();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_optimize_sends_last_ai_message() {
        let (_rt, backend, mut chat) = setup(vec![
            Reply::json(json!({ "code": "let a = 1;" })),
            Reply::json(json!({ "optimizedCode": "const a = 1;", "explanation": "use const" })),
        ]);
        chat.generate_code();
        chat.wait_for_response(WAIT);
        let generated = chat.messages[1].text.clone();

        chat.optimize_code();
        // No user message for optimize
        assert_eq!(chat.messages.len(), 2);
        assert!(chat.wait_for_response(WAIT));

        assert_eq!(backend.calls()[1].endpoint, "/api/optimize");
        assert_eq!(
            backend.calls()[1].payload,
            json!({ "code": generated, "issue": "performance", "target": "web" })
        );
        assert_eq!(
            chat.messages[2].text,
            "Optimized code:\n\n```javascript\nconst a = 1;\n```\n\n**Improvements:**\nuse const"
        );
    }

    #[test]
    fn test_analyze_uses_threejs_context() {
        let (_rt, backend, mut chat) = setup(vec![Reply::json(json!({ "response": "ok" }))]);
        chat.context = "general".to_string();
        chat.input = "draw calls".to_string();
        chat.analyze_performance();
        assert_eq!(chat.messages[0].text, "Performance analysis: draw calls");
        chat.wait_for_response(WAIT);
        assert_eq!(
            backend.calls()[0].payload,
            json!({ "message": "Performance analysis: draw calls", "context": "threejs" })
        );
    }

    #[test]
    fn test_status_error_appends_generic_message() {
        let (_rt, _backend, mut chat) = setup(vec![Reply::Fail(BackendError::Status(500))]);
        chat.input = "hello".to_string();
        chat.send_message();
        assert!(chat.wait_for_response(WAIT));

        assert_eq!(chat.messages.len(), 2);
        assert!(chat.messages[1].is_error);
        assert_eq!(chat.messages[1].text, ChatOp::Chat.error_message());
        assert!(!chat.is_loading());
        assert!(!chat.is_typing());
        assert!(chat.last_ai_message().is_none());
    }

    #[test]
    fn test_decode_error_appends_generic_message() {
        let (_rt, _backend, mut chat) = setup(vec![Reply::json(json!({ "unexpected": true }))]);
        chat.generate_code();
        chat.wait_for_response(WAIT);
        assert_eq!(chat.messages[1].text, ChatOp::GenerateCode.error_message());
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_new_chat_clears_and_drops_stale_response() {
        let (_rt, _backend, mut chat) = setup(vec![Reply::json(json!({ "response": "late" }))]);
        chat.input = "hello".to_string();
        chat.send_message();
        chat.new_chat();

        assert!(chat.messages.is_empty());
        assert!(!chat.is_typing());
        assert_eq!(chat.view, ConversationView::Welcome);
        assert!(chat.last_ai_message().is_none());

        // Still loading until the abandoned request resolves
        assert!(chat.is_loading());
        chat.input = "next".to_string();
        assert!(!chat.can_send());

        assert!(chat.wait_for_response(WAIT));
        assert!(chat.messages.is_empty());
        assert!(!chat.is_loading());
        assert!(chat.can_send());
    }

    #[test]
    fn test_suggestion_fills_input_only() {
        let (_rt, backend, mut chat) = setup(vec![]);
        chat.apply_suggestion(SUGGESTIONS[0]);
        assert_eq!(chat.input, SUGGESTIONS[0]);
        assert!(chat.messages.is_empty());
        assert!(chat.take_focus_request());
        assert!(!chat.take_focus_request());
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_quick_action_sends() {
        let (_rt, backend, mut chat) = setup(vec![Reply::json(json!({ "response": "sure" }))]);
        chat.run_quick_action(QUICK_ACTIONS[0].prompt);
        assert_eq!(chat.messages[0].text, QUICK_ACTIONS[0].prompt);
        chat.wait_for_response(WAIT);
        assert_eq!(backend.calls()[0].payload["message"], QUICK_ACTIONS[0].prompt);
    }

    #[test]
    fn test_reply_matching_notice_text_is_optimizable() {
        let (_rt, backend, mut chat) = setup(vec![
            Reply::json(json!({ "response": NOTHING_TO_OPTIMIZE })),
            Reply::json(json!({ "optimizedCode": "x", "explanation": "y" })),
        ]);
        chat.input = "echo the notice".to_string();
        chat.send_message();
        assert!(chat.wait_for_response(WAIT));
        assert_eq!(chat.last_ai_message(), Some(NOTHING_TO_OPTIMIZE));

        chat.optimize_code();
        assert!(chat.wait_for_response(WAIT));
        assert_eq!(backend.calls()[1].payload["code"], NOTHING_TO_OPTIMIZE);
    }

    #[test]
    fn test_notice_is_flagged() {
        let (_rt, _backend, mut chat) = setup(vec![]);
        chat.optimize_code();
        let notice = &chat.messages[0];
        assert!(notice.is_notice);
        assert!(!notice.is_error);
        assert!(chat.last_ai_message().is_none());
    }
}
