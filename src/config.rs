//! Configuration surface supplied by an embedding application.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_HIGHPASS_CUTOFF_HZ, REFERENCE_POWER};

/// Settings handed to [`crate::Mixer`] at construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfig {
    /// Target average power every final mixture is renormalized to.
    pub reference_power: f64,
    /// Cutoff of the zero-phase high-pass applied to recorded noise.
    pub highpass_cutoff_hz: f64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            reference_power: REFERENCE_POWER,
            highpass_cutoff_hz: DEFAULT_HIGHPASS_CUTOFF_HZ,
        }
    }
}

/// Discovery settings for [`crate::Corpus::fetch`].
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Files or directories to load.
    pub include: Vec<PathBuf>,
    /// Regex patterns; any match anywhere in a path skips it (and, for a
    /// directory, its whole subtree).
    pub exclude: Vec<String>,
    /// Descend into subdirectories of directory includes.
    pub recursive: bool,
    /// Merge into the existing corpus instead of replacing it.
    pub append: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            recursive: false,
            append: true,
        }
    }
}
