//! Waveform to WAV container encoding

use hound::{WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

use crate::error::{Error, Result};

/// Encodes f32 waveforms into an in-memory WAV container (16-bit PCM).
pub struct AudioEncoder {
    sample_rate: u32,
    channels: u16,
}

impl AudioEncoder {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Encode samples in [-1.0, 1.0] to WAV bytes.
    pub fn encode_wav(&self, samples: &[f32]) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer =
                WavWriter::new(&mut buffer, spec).map_err(|e| Error::EncodeError(e.to_string()))?;

            for &sample in samples {
                let sample_i16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                writer
                    .write_sample(sample_i16)
                    .map_err(|e| Error::EncodeError(e.to_string()))?;
            }

            writer
                .finalize()
                .map_err(|e| Error::EncodeError(e.to_string()))?;
        }

        debug!(
            "Encoded {} samples to WAV ({} bytes)",
            samples.len(),
            buffer.get_ref().len()
        );
        Ok(buffer.into_inner())
    }
}
