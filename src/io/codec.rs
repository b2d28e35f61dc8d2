//! Decode/encode seams and the built-in WAV implementation.
//!
//! Decoding the richer container formats (mp3, flac, ogg, ...) is an
//! external collaborator's job; embedders plug their own [`Decoder`] in
//! through [`crate::Corpus::with_codec`]. The built-ins handle WAV.

use std::path::Path;

use hound::{SampleFormat, WavSpec};
use tracing::debug;

use crate::error::{Error, Result};

use super::SampleBuffer;

/// Decodes an audio file into a mono sample buffer.
pub trait Decoder {
    fn decode(&self, path: &Path) -> Result<SampleBuffer>;
}

/// Encodes a sample buffer to an audio file.
pub trait Encoder {
    fn encode(&self, path: &Path, buffer: &SampleBuffer) -> Result<()>;
}

/// WAV decoder backed by hound. Integer formats are normalized to
/// [-1, 1]; multi-channel input is downmixed to mono by averaging
/// channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, path: &Path) -> Result<SampleBuffer> {
        let fail = |reason: String| Error::DecodeFailure {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = hound::WavReader::open(path).map_err(|e| fail(e.to_string()))?;
        let spec = reader.spec();

        let interleaved: Vec<f64> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<_, _>>(),
            SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 * scale))
                    .collect()
            }
        }
        .map_err(|e| fail(e.to_string()))?;

        let channels = spec.channels.max(1) as usize;
        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f64>() / channels as f64)
                .collect()
        };

        debug!(
            path = %path.display(),
            samples = samples.len(),
            sample_rate = spec.sample_rate,
            "decoded"
        );
        Ok(SampleBuffer::new(samples, spec.sample_rate))
    }
}

/// WAV encoder backed by hound: mono, 32-bit float.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavEncoder;

impl Encoder for WavEncoder {
    fn encode(&self, path: &Path, buffer: &SampleBuffer) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: buffer.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &buffer.samples {
            writer.write_sample(sample as f32)?;
        }
        writer.finalize()?;
        Ok(())
    }
}
