pub mod config;
pub mod dsp;
pub mod error;
pub mod io;

pub use config::{CorpusConfig, MixerConfig};
pub use dsp::{MixMode, MixOutput, MixRequest, Mixer, NoiseKind, PowerReport};
pub use error::{Error, Result};
pub use io::{Corpus, SampleBuffer};

/// Average power of the reference speech corpus. Every final mixture is
/// renormalized to this level unless the caller overrides it in
/// [`MixerConfig`].
pub const REFERENCE_POWER: f64 = 0.0008270979304005066;

/// Default cutoff for the ambient-noise high-pass, in Hz.
pub const DEFAULT_HIGHPASS_CUTOFF_HZ: f64 = 128.0;
