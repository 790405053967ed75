//! Canned backends and responses for tests and the headless harness.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::backend::{Backend, BackendError, BackendFuture};

/// What a [`ScriptedBackend`] answers to the next request
#[derive(Debug, Clone)]
pub enum Reply {
    /// 2xx with this JSON body
    Json(Value),
    /// Transport-level failure
    Fail(BackendError),
    /// Never resolves (a hung request)
    Hang,
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Reply::Json(body)
    }

    pub fn status(code: u16) -> Self {
        Reply::Fail(BackendError::Status(code))
    }
}

/// One request seen by a [`ScriptedBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub payload: Value,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    calls: Vec<RecordedCall>,
}

/// Backend that answers from a queue and records every call.
/// Clones share the same queue and log.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                replies: replies.into(),
                calls: Vec::new(),
            })),
        }
    }

    /// Queue another reply
    pub fn push(&self, reply: Reply) {
        if let Ok(mut s) = self.script.lock() {
            s.replies.push_back(reply);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().map(|s| s.calls.len()).unwrap_or(0)
    }
}

impl Backend for ScriptedBackend {
    fn post_json(&self, endpoint: &str, payload: Value) -> BackendFuture {
        let reply = match self.script.lock() {
            Ok(mut s) => {
                s.calls.push(RecordedCall {
                    endpoint: endpoint.to_string(),
                    payload,
                });
                s.replies.pop_front()
            }
            Err(_) => None,
        };

        match reply {
            Some(Reply::Json(body)) => Box::pin(async move { Ok(body) }),
            Some(Reply::Fail(e)) => Box::pin(async move { Err(e) }),
            Some(Reply::Hang) => Box::pin(std::future::pending::<Result<Value, BackendError>>()),
            None => {
                let msg = format!("no scripted reply for {endpoint}");
                Box::pin(async move { Err(BackendError::Network(msg)) })
            }
        }
    }
}

// ── Canned bodies ───────────────────────────────────────────────

pub fn chat_body(text: &str) -> Value {
    json!({ "response": text })
}

pub fn code_body(code: &str) -> Value {
    json!({ "code": code })
}

pub fn optimize_body(code: &str, explanation: &str) -> Value {
    json!({ "optimizedCode": code, "explanation": explanation })
}

/// Minimal rotating-cube scene, as a backend would return it
pub const SAMPLE_SCENE_CODE: &str = "const scene = new THREE.Scene();
const camera = new THREE.PerspectiveCamera(75, innerWidth / innerHeight, 0.1, 1000);
const renderer = new THREE.WebGLRenderer();
const cube = new THREE.Mesh(new THREE.BoxGeometry(), new THREE.MeshNormalMaterial());
scene.add(cube);
camera.position.z = 5;
renderer.setAnimationLoop(() => {
  cube.rotation.x += 0.01;
  cube.rotation.y += 0.01;
  renderer.render(scene, camera);
});";
