//! Application settings

use serde::{Deserialize, Serialize};

use super::preview::DEFAULT_ROTATION_STEP;

/// Environment variable that overrides the configured backend address
pub const BACKEND_URL_ENV: &str = "THREE_AI_BACKEND_URL";

const DEFAULT_BACKEND_URL: &str = "https://your-worker.your-account.workers.dev";

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base address; endpoint paths are appended to it
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Context tag selected on startup
    pub default_context: String,
    /// Tags offered by the context selector
    pub contexts: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            default_context: "threejs".to_string(),
            contexts: ["threejs", "webgl", "shaders", "general"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// 3D preview settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Radians added to x/y rotation per frame
    pub rotation_step: f32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            rotation_step: DEFAULT_ROTATION_STEP,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Language::default(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub backend: BackendSettings,
    pub chat: ChatSettings,
    pub preview: PreviewSettings,
    pub ui: UiSettings,
}

impl AppSettings {
    /// Load settings from file (or defaults), then apply the environment override
    pub fn load() -> Self {
        let mut settings = Self::load_file().unwrap_or_default();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            settings.apply_backend_override(&url);
        }
        settings
    }

    fn load_file() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("com", "three-ai", "three-ai")?;
        let config_path = dirs.config_dir().join("settings.json");
        let json = std::fs::read_to_string(&config_path).ok()?;
        match Self::from_json(&json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("Ignoring malformed settings at {}: {e}", config_path.display());
                None
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace the backend address if `url` is not blank
    pub fn apply_backend_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.backend.base_url = url.to_string();
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "three-ai", "three-ai") {
            let config_dir = dirs.config_dir();
            if let Err(e) = std::fs::create_dir_all(config_dir) {
                tracing::warn!("Cannot create config dir {}: {e}", config_dir.display());
                return;
            }
            let config_path = config_dir.join("settings.json");
            match serde_json::to_string_pretty(self) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to write settings: {e}");
                    }
                }
                Err(e) => tracing::warn!("Failed to serialize settings: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AppSettings::default();
        assert_eq!(s.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(s.chat.default_context, "threejs");
        assert!(s.chat.contexts.contains(&"threejs".to_string()));
        assert_eq!(s.preview.rotation_step, 0.01);
        assert_eq!(s.ui.language, Language::En);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = AppSettings::from_json(r#"{"backend": {"base_url": "http://localhost:8787"}}"#).unwrap();
        assert_eq!(s.backend.base_url, "http://localhost:8787");
        assert_eq!(s.ui.font_size, 14.0);
        assert_eq!(s.chat.default_context, "threejs");
    }

    #[test]
    fn test_language_wire_name() {
        let s = AppSettings::from_json(r#"{"ui": {"language": "ru"}}"#).unwrap();
        assert_eq!(s.ui.language, Language::Ru);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(AppSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_backend_override_ignores_blank() {
        let mut s = AppSettings::default();
        s.apply_backend_override("   ");
        assert_eq!(s.backend.base_url, DEFAULT_BACKEND_URL);
        s.apply_backend_override(" http://127.0.0.1:3001 ");
        assert_eq!(s.backend.base_url, "http://127.0.0.1:3001");
    }
}
