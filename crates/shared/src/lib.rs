use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Запрос к бэкенду: знает свой путь и тип ответа
pub trait ApiRequest: Serialize + Send + Sync + 'static {
    /// Путь эндпоинта относительно базового адреса, например `/api/chat`
    const PATH: &'static str;
    /// Тип тела успешного ответа
    type Response: DeserializeOwned + Send + 'static;
}

// ============================================================================
// /api/chat
// ============================================================================

/// Сообщение чата с контекстом (тег, непрозрачный для клиента)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: String,
}

/// Ответ чата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ApiRequest for ChatRequest {
    const PATH: &'static str = "/api/chat";
    type Response = ChatResponse;
}

// ============================================================================
// /api/generate-code
// ============================================================================

/// Что генерировать
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeKind {
    ThreejsScene,
}

/// Уровень сложности сгенерированного кода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
}

/// Запрос генерации кода
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateCodeRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: CodeKind,
    pub complexity: Complexity,
}

impl GenerateCodeRequest {
    /// Сцена Three.js средней сложности
    pub fn threejs_scene(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: CodeKind::ThreejsScene,
            complexity: Complexity::Intermediate,
        }
    }
}

/// Сгенерированный код
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateCodeResponse {
    pub code: String,
}

impl ApiRequest for GenerateCodeRequest {
    const PATH: &'static str = "/api/generate-code";
    type Response = GenerateCodeResponse;
}

// ============================================================================
// /api/optimize
// ============================================================================

/// Запрос оптимизации кода
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub code: String,
    pub issue: String,
    pub target: String,
}

impl OptimizeRequest {
    /// Оптимизация производительности для веба
    pub fn performance(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            issue: "performance".to_string(),
            target: "web".to_string(),
        }
    }
}

/// Оптимизированный код и пояснение
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub optimized_code: String,
    pub explanation: String,
}

impl ApiRequest for OptimizeRequest {
    const PATH: &'static str = "/api/optimize";
    type Response = OptimizeResponse;
}
