//! Configuration for the Sauti TTS backend

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sample rate used when the engine does not report one.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Speaking-rate multiplier applied when voice cloning is requested.
/// Empirically tuned; cloned timbre tends to rush without it.
pub const DEFAULT_CLONING_SPEED: f32 = 0.85;

/// Backend configuration, resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// HuggingFace model repo to load weights from
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Access token for gated model repos
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Directory used as download cache and working directory
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Speaking-rate multiplier for voice-cloned synthesis
    #[serde(default = "default_cloning_speed")]
    pub cloning_speed: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            auth_token: None,
            download_dir: default_download_dir(),
            cloning_speed: default_cloning_speed(),
        }
    }
}

impl BackendConfig {
    /// Build a configuration from the environment, falling back to the
    /// defaults for anything unset.
    ///
    /// Recognized variables: `SAUTI_MODEL_ID`, `HUGGINGFACE_HUB_TOKEN` (or
    /// `HF_TOKEN`), `SAUTI_DOWNLOAD_DIR`, `SAUTI_CLONING_SPEED`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(model_id) = std::env::var("SAUTI_MODEL_ID") {
            if !model_id.is_empty() {
                config.model_id = model_id;
            }
        }

        config.auth_token = std::env::var("HUGGINGFACE_HUB_TOKEN")
            .or_else(|_| std::env::var("HF_TOKEN"))
            .ok()
            .filter(|t| !t.is_empty());

        if let Ok(dir) = std::env::var("SAUTI_DOWNLOAD_DIR") {
            if !dir.is_empty() {
                config.download_dir = PathBuf::from(dir);
            }
        }

        if let Ok(speed) = std::env::var("SAUTI_CLONING_SPEED") {
            if let Ok(speed) = speed.parse::<f32>() {
                config.cloning_speed = speed;
            }
        }

        config
    }
}

fn default_model_id() -> String {
    "coqui/XTTS-v2".to_string()
}

fn default_download_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sauti")
        .join("models")
}

fn default_cloning_speed() -> f32 {
    DEFAULT_CLONING_SPEED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.model_id, "coqui/XTTS-v2");
        assert!(config.auth_token.is_none());
        assert_eq!(config.cloning_speed, DEFAULT_CLONING_SPEED);
        assert!(config.download_dir.ends_with("sauti/models"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"model_id": "acme/other-tts"}"#).unwrap();
        assert_eq!(config.model_id, "acme/other-tts");
        assert_eq!(config.cloning_speed, DEFAULT_CLONING_SPEED);
    }
}
