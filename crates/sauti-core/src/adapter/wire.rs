//! Wire-level request and response types
//!
//! The host transport delivers scalar string fields by name and takes scalar
//! string fields back. Field names follow the original model signature:
//! `TEXT` and `SPEAKER_WAV_B64` in, `AUDIO_B64` out.

use serde::Serialize;
use std::collections::HashMap;

/// Name of the required text input field.
pub const TEXT_INPUT: &str = "TEXT";
/// Name of the optional base64 reference-voice input field.
pub const SPEAKER_WAV_INPUT: &str = "SPEAKER_WAV_B64";
/// Name of the base64 audio output field.
pub const AUDIO_OUTPUT: &str = "AUDIO_B64";

/// One inbound request as the transport hands it over: named scalar strings.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    fields: HashMap<String, String>,
}

impl RawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Scalar value of a field, or `None` if the transport never sent it.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// One outbound response: base64 audio on success, an error message on
/// failure, never both.
#[derive(Debug, Clone, Serialize)]
pub struct InferResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_b64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl InferResponse {
    pub fn success(audio_b64: String) -> Self {
        Self {
            audio_b64: Some(audio_b64),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            audio_b64: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.audio_b64.is_some()
    }

    pub fn audio_b64(&self) -> Option<&str> {
        self.audio_b64.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
