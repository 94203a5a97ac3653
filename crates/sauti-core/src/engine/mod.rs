//! Synthesis engine abstraction and the XTTS daemon bridge

mod xtts_bridge;

pub use xtts_bridge::XttsBridge;

use std::path::Path;

use crate::error::Result;

/// The external text-to-speech engine this backend adapts.
///
/// Implementations are loaded once from a local weight snapshot and then
/// called once per request. `synthesize` must not mutate engine state visible
/// to other callers; the backend shares one engine across all requests.
pub trait SynthesisEngine: Send + Sync {
    /// Instantiate the engine from an on-disk weight snapshot.
    fn load(snapshot_dir: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Synthesize `text` into a mono f32 waveform in [-1, 1].
    ///
    /// `speaker_wav` points at a reference recording for voice cloning;
    /// `speed` is a speaking-rate multiplier (1.0 = native pace).
    fn synthesize(
        &self,
        text: &str,
        speaker_wav: Option<&Path>,
        speed: Option<f32>,
    ) -> Result<Vec<f32>>;

    /// Native output sample rate, if the engine reports one.
    fn output_sample_rate(&self) -> Option<u32> {
        None
    }
}
