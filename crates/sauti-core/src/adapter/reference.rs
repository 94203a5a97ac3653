//! Scoped temporary file for the reference-voice recording

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A reference-voice recording materialized to a uniquely named `.wav` file
/// for the duration of one synthesis call.
///
/// The file is deleted when the guard drops, on every exit path. A failed
/// deletion is logged rather than surfaced, so it can never mask the error
/// that ended the request.
#[derive(Debug)]
pub struct ReferenceVoice {
    file: Option<NamedTempFile>,
}

impl ReferenceVoice {
    /// Write `wav_bytes` to a fresh temp file and hand back the guard.
    pub fn materialize(wav_bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("sauti-ref-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| Error::TempResourceError(format!("create reference file: {}", e)))?;

        file.write_all(wav_bytes)
            .and_then(|_| file.flush())
            .map_err(|e| Error::TempResourceError(format!("write reference file: {}", e)))?;

        debug!(
            "Reference voice ({} bytes) -> {:?}",
            wav_bytes.len(),
            file.path()
        );
        Ok(Self { file: Some(file) })
    }

    pub fn path(&self) -> &Path {
        // file is only None after drop
        self.file.as_ref().expect("reference file already released").path()
    }
}

impl Drop for ReferenceVoice {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            if let Err(err) = file.close() {
                warn!("Failed to remove reference file {:?}: {}", path, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_and_release() {
        let voice = ReferenceVoice::materialize(b"RIFFfake").unwrap();
        let path = voice.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFFfake");

        drop(voice);
        assert!(!path.exists());
    }

    #[test]
    fn test_unique_paths() {
        let a = ReferenceVoice::materialize(b"a").unwrap();
        let b = ReferenceVoice::materialize(b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
