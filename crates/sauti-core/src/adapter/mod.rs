//! Request adapter: wire payload in, wire payload out
//!
//! One call to [`handle`] per request. Decode the text and the optional
//! reference voice, synthesize, encode WAV, base64 the container. Every
//! per-request error is caught here and becomes a failure response; nothing
//! from a single bad request escapes to the process.

mod reference;
mod wire;

pub use reference::ReferenceVoice;
pub use wire::{InferResponse, RawRequest, AUDIO_OUTPUT, SPEAKER_WAV_INPUT, TEXT_INPUT};

use tracing::{debug, error};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::audio::AudioEncoder;
use crate::error::{Error, Result};
use crate::model::ModelHandle;

/// Process one request against the shared, read-only model handle.
///
/// Always returns exactly one response; the reference-voice temp file, if
/// one was created, is gone by the time this returns.
pub fn handle(request: &RawRequest, model: &ModelHandle) -> InferResponse {
    match synthesize_request(request, model) {
        Ok(audio_b64) => InferResponse::success(audio_b64),
        Err(err) => {
            error!("Request failed: {}", err);
            InferResponse::failure(err.to_string())
        }
    }
}

fn synthesize_request(request: &RawRequest, model: &ModelHandle) -> Result<String> {
    // Missing TEXT decodes to empty; whether the engine accepts empty text
    // is the engine's call, not a protocol error.
    let text = request.scalar(TEXT_INPUT).unwrap_or_default();
    debug!("Request text: {:.80}", text);

    // The guard lives until the end of this function, so the temp file is
    // removed on success and on every `?` below.
    let reference = decode_reference(request)?;

    let samples = match &reference {
        Some(voice) => model.engine().synthesize(
            text,
            Some(voice.path()),
            Some(model.cloning_speed()),
        )?,
        None => model.engine().synthesize(text, None, None)?,
    };

    let wav_bytes = AudioEncoder::new(model.sample_rate(), 1).encode_wav(&samples)?;
    Ok(BASE64.encode(wav_bytes))
}

/// Decode the optional reference-voice field into a scoped temp file.
///
/// Absent or empty means "no cloning requested" and is never an error;
/// present but not valid base64 is a per-request decode failure.
fn decode_reference(request: &RawRequest) -> Result<Option<ReferenceVoice>> {
    let field = match request.scalar(SPEAKER_WAV_INPUT) {
        None => return Ok(None),
        Some(value) if value.is_empty() => return Ok(None),
        Some(value) => value,
    };

    let wav_bytes = BASE64.decode(field.trim().as_bytes()).map_err(|e| {
        Error::PayloadDecodeError(format!("invalid base64 in {}: {}", SPEAKER_WAV_INPUT, e))
    })?;

    Ok(Some(ReferenceVoice::materialize(&wav_bytes)?))
}
