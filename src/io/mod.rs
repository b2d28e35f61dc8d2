// Purpose - external interfaces: sample buffers, codecs, corpus management

pub mod codec;
pub mod corpus;

pub use codec::{Decoder, Encoder, WavDecoder, WavEncoder};
pub use corpus::Corpus;

/// A mono audio clip: amplitude samples plus the rate they were captured at.
///
/// Samples are typically in [-1.0, +1.0] but the range is not enforced;
/// intermediate mixing stages routinely leave it.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0);
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
