use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("include path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("failed to decode {path}: {reason}")]
    DecodeFailure { path: PathBuf, reason: String },

    #[error("output directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("signal buffer is empty")]
    EmptySignal,

    #[error("noise fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),

    #[error("unknown noise type '{0}'")]
    UnknownNoiseType(String),

    #[error("ambient recording too short: need {needed} samples, have {available}")]
    InsufficientNoiseLength { needed: usize, available: usize },

    #[error("no ambient recording loaded for recorded noise")]
    AmbientMissing,

    #[error("signal or noise has zero average power")]
    ZeroPowerSource,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
