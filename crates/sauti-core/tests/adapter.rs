//! Request adapter tests against a fake synthesis engine

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use sauti_core::adapter::{self, RawRequest, SPEAKER_WAV_INPUT, TEXT_INPUT};
use sauti_core::config::DEFAULT_CLONING_SPEED;
use sauti_core::{Error, ModelHandle, Result, SynthesisEngine};

#[derive(Debug, Clone)]
struct RecordedCall {
    text: String,
    reference: Option<PathBuf>,
    reference_existed: bool,
    speed: Option<f32>,
}

/// Engine double that records every synthesize call and returns a short
/// sine burst.
#[derive(Default)]
struct FakeEngine {
    reject_empty_text: bool,
    fail_always: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeEngine {
    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl SynthesisEngine for FakeEngine {
    fn load(_snapshot_dir: &Path) -> Result<Self> {
        Ok(Self::default())
    }

    fn synthesize(
        &self,
        text: &str,
        speaker_wav: Option<&Path>,
        speed: Option<f32>,
    ) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(RecordedCall {
            text: text.to_string(),
            reference: speaker_wav.map(Path::to_path_buf),
            reference_existed: speaker_wav.map(Path::exists).unwrap_or(false),
            speed,
        });

        if self.fail_always {
            return Err(Error::SynthesisError("engine is broken".to_string()));
        }
        if self.reject_empty_text && text.is_empty() {
            return Err(Error::SynthesisError("cannot synthesize empty text".to_string()));
        }

        Ok((0..441).map(|i| (i as f32 * 0.05).sin() * 0.5).collect())
    }

    fn output_sample_rate(&self) -> Option<u32> {
        Some(22050)
    }
}

fn handle_for(engine: Arc<FakeEngine>) -> ModelHandle {
    ModelHandle::with_engine(engine, 22050, std::env::temp_dir())
}

fn reference_wav_b64() -> String {
    // Content does not need to be a real recording; the adapter only
    // materializes the bytes.
    BASE64.encode(b"RIFF....WAVEfake reference recording")
}

#[test]
fn default_voice_produces_decodable_wav() {
    let engine = Arc::new(FakeEngine::default());
    let model = handle_for(engine.clone());

    let request = RawRequest::new().with_field(TEXT_INPUT, "hello there");
    let response = adapter::handle(&request, &model);

    assert!(response.is_success(), "error: {:?}", response.error());
    let wav_bytes = BASE64.decode(response.audio_b64().unwrap()).unwrap();
    let reader = hound::WavReader::new(Cursor::new(wav_bytes)).unwrap();
    assert_eq!(reader.spec().sample_rate, 22050);
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len(), 441);

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "hello there");
    assert!(calls[0].reference.is_none());
    assert!(calls[0].speed.is_none());
}

#[test]
fn cloning_passes_scoped_reference_and_speed() {
    let engine = Arc::new(FakeEngine::default());
    let model = handle_for(engine.clone());

    let request = RawRequest::new()
        .with_field(TEXT_INPUT, "clone me")
        .with_field(SPEAKER_WAV_INPUT, reference_wav_b64());
    let response = adapter::handle(&request, &model);
    assert!(response.is_success());

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let reference = calls[0].reference.as_ref().expect("engine saw no reference");
    assert_eq!(reference.extension().and_then(|e| e.to_str()), Some("wav"));
    assert!(calls[0].reference_existed, "file must exist during synthesis");
    assert!(!reference.exists(), "file must be gone after the response");
    assert_eq!(calls[0].speed, Some(DEFAULT_CLONING_SPEED));
}

#[test]
fn cloning_speed_is_configurable() {
    let engine = Arc::new(FakeEngine::default());
    let model = ModelHandle::with_engine(engine.clone(), 22050, std::env::temp_dir())
        .with_cloning_speed(0.92);

    let request = RawRequest::new()
        .with_field(TEXT_INPUT, "clone me")
        .with_field(SPEAKER_WAV_INPUT, reference_wav_b64());
    assert!(adapter::handle(&request, &model).is_success());

    assert_eq!(engine.calls()[0].speed, Some(0.92));
}

#[test]
fn invalid_base64_reference_fails_without_reaching_engine() {
    let engine = Arc::new(FakeEngine::default());
    let model = handle_for(engine.clone());

    let request = RawRequest::new()
        .with_field(TEXT_INPUT, "hello")
        .with_field(SPEAKER_WAV_INPUT, "not-base64!!");
    let response = adapter::handle(&request, &model);

    assert!(!response.is_success());
    assert!(response.audio_b64().is_none());
    assert!(response.error().unwrap().contains("base64"));
    assert!(engine.calls().is_empty());
}

#[test]
fn empty_text_yields_exactly_one_failure_response() {
    let engine = Arc::new(FakeEngine {
        reject_empty_text: true,
        ..Default::default()
    });
    let model = handle_for(engine.clone());

    let response = adapter::handle(&RawRequest::new(), &model);
    assert!(!response.is_success());
    assert!(response.error().unwrap().contains("empty text"));
    assert_eq!(engine.calls().len(), 1);
}

#[test]
fn reference_file_removed_when_synthesis_fails() {
    let engine = Arc::new(FakeEngine {
        fail_always: true,
        ..Default::default()
    });
    let model = handle_for(engine.clone());

    let request = RawRequest::new()
        .with_field(TEXT_INPUT, "doomed")
        .with_field(SPEAKER_WAV_INPUT, reference_wav_b64());
    let response = adapter::handle(&request, &model);

    assert!(!response.is_success());
    let calls = engine.calls();
    let reference = calls[0].reference.as_ref().unwrap();
    assert!(calls[0].reference_existed);
    assert!(!reference.exists());
}

#[test]
fn back_to_back_requests_are_independent() {
    let engine = Arc::new(FakeEngine::default());
    let model = handle_for(engine.clone());

    let cloned = RawRequest::new()
        .with_field(TEXT_INPUT, "first")
        .with_field(SPEAKER_WAV_INPUT, reference_wav_b64());
    let plain = RawRequest::new().with_field(TEXT_INPUT, "second");

    assert!(adapter::handle(&cloned, &model).is_success());
    assert!(adapter::handle(&plain, &model).is_success());

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].reference.is_some());
    // No cloning state may leak from the first request into the second.
    assert!(calls[1].reference.is_none());
    assert!(calls[1].speed.is_none());
}
