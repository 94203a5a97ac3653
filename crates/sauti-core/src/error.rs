//! Error types for the Sauti TTS backend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Model fetch failed: {0}")]
    ModelFetchError(String),

    #[error("Model loading failed: {0}")]
    ModelLoadError(String),

    #[error("Payload decode failed: {0}")]
    PayloadDecodeError(String),

    #[error("Synthesis failed: {0}")]
    SynthesisError(String),

    #[error("Audio encoding failed: {0}")]
    EncodeError(String),

    #[error("Temporary resource failure: {0}")]
    TempResourceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors that abort startup; everything else is caught at the
    /// request boundary and turned into a failure response.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ModelFetchError(_) | Error::ModelLoadError(_) | Error::ConfigError(_)
        )
    }
}

impl From<hf_hub::api::sync::ApiError> for Error {
    fn from(e: hf_hub::api::sync::ApiError) -> Self {
        Error::ModelFetchError(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::PayloadDecodeError(e.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        Error::EncodeError(e.to_string())
    }
}
