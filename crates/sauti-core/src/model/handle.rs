//! Process-lifetime model handle

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::{BackendConfig, DEFAULT_SAMPLE_RATE};
use crate::engine::SynthesisEngine;
use crate::error::Result;
use crate::model::fetch::SnapshotFetcher;

/// The loaded synthesis engine plus everything a request needs to use it.
///
/// Constructed once at startup by [`ModelHandle::initialize`] and shared
/// read-only with every request; nothing in it is mutated afterwards.
pub struct ModelHandle {
    engine: Arc<dyn SynthesisEngine>,
    sample_rate: u32,
    snapshot_dir: PathBuf,
    cloning_speed: f32,
}

impl ModelHandle {
    /// One-time startup: fetch the weight snapshot, load the engine from the
    /// local snapshot, and record its output sample rate.
    ///
    /// Failures here are fatal; the process must not serve requests without a
    /// handle.
    pub fn initialize<E: SynthesisEngine + 'static>(config: &BackendConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.download_dir)?;

        info!(
            "Initializing model {} (cache {:?})",
            config.model_id, config.download_dir
        );

        let fetcher = SnapshotFetcher::new(config.download_dir.clone(), config.auth_token.clone());
        let snapshot_dir = fetcher.fetch(&config.model_id)?;
        info!("Snapshot ready at {:?}", snapshot_dir);

        // Load from the local snapshot only, so restarts keep working when
        // the hub does not.
        let engine = E::load(&snapshot_dir)?;
        let sample_rate = engine.output_sample_rate().unwrap_or(DEFAULT_SAMPLE_RATE);
        info!("Engine loaded, output sample rate {} Hz", sample_rate);

        Ok(Self {
            engine: Arc::new(engine),
            sample_rate,
            snapshot_dir,
            cloning_speed: config.cloning_speed,
        })
    }

    /// Build a handle around an already-loaded engine. This is the seam for
    /// testing the request path without weights on disk.
    pub fn with_engine(
        engine: Arc<dyn SynthesisEngine>,
        sample_rate: u32,
        snapshot_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            sample_rate,
            snapshot_dir,
            cloning_speed: crate::config::DEFAULT_CLONING_SPEED,
        }
    }

    pub fn with_cloning_speed(mut self, cloning_speed: f32) -> Self {
        self.cloning_speed = cloning_speed;
        self
    }

    pub fn engine(&self) -> &dyn SynthesisEngine {
        self.engine.as_ref()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn cloning_speed(&self) -> f32 {
        self.cloning_speed
    }
}
