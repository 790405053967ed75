//! HTTP boundary to the code-generation backend.
//!
//! Every request the client makes goes through [`call`], which encodes a typed
//! [`ApiRequest`], POSTs it through a [`Backend`] and decodes the typed response.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use shared::ApiRequest;

/// Why a backend call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Connection, DNS or I/O failure before a status was received
    Network(String),
    /// Server answered with a non-2xx status
    Status(u16),
    /// Request payload could not be serialized
    Encode(String),
    /// Body was not JSON or did not match the expected response shape
    Decode(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "Network error: {}", msg),
            BackendError::Status(code) => write!(f, "HTTP error! status: {}", code),
            BackendError::Encode(msg) => write!(f, "Encode error: {}", msg),
            BackendError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

pub type BackendFuture = Pin<Box<dyn Future<Output = Result<Value, BackendError>> + Send>>;

/// Transport for JSON POST requests. Swappable for tests.
pub trait Backend: Send + Sync {
    fn post_json(&self, endpoint: &str, payload: Value) -> BackendFuture;
}

/// Send a typed request and decode its typed response.
pub async fn call<R: ApiRequest>(backend: &dyn Backend, request: &R) -> Result<R::Response, BackendError> {
    let payload = serde_json::to_value(request).map_err(|e| BackendError::Encode(e.to_string()))?;
    let body = backend.post_json(R::PATH, payload).await?;
    serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// reqwest-based backend talking to `{base_url}{endpoint}`
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl Backend for HttpBackend {
    fn post_json(&self, endpoint: &str, payload: Value) -> BackendFuture {
        let url = self.endpoint_url(endpoint);
        // .json() also sets `Content-Type: application/json`
        let request = self.client.post(&url).json(&payload);

        Box::pin(async move {
            tracing::debug!("POST {url}");
            let response = request
                .send()
                .await
                .map_err(|e| BackendError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(BackendError::Status(status.as_u16()));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| BackendError::Decode(e.to_string()))
        })
    }
}
