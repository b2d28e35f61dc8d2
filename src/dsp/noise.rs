//! Noise kinds, white-noise generators, and the prepared ambient bank.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::SampleBuffer;

use super::filter;

/// The closed set of noise sources the mixer can draw from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// i.i.d. samples uniform on [-1, 1].
    Uniform,
    /// i.i.d. normal samples, mean 0, sigma 0.5.
    Gaussian,
    /// Signal-length prefix of the ambient recording, as recorded.
    RecordedRaw,
    /// Same prefix, after the startup high-pass.
    RecordedFiltered,
}

impl FromStr for NoiseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "gaussian" => Ok(Self::Gaussian),
            "recorded-raw" => Ok(Self::RecordedRaw),
            "recorded-filtered" => Ok(Self::RecordedFiltered),
            other => Err(Error::UnknownNoiseType(other.to_string())),
        }
    }
}

/// Uniform white noise on [-1, 1].
pub fn white_uniform(len: usize, rng: &mut fastrand::Rng) -> Vec<f64> {
    (0..len).map(|_| rng.f64() * 2.0 - 1.0).collect()
}

/// Gaussian white noise, mean 0, sigma 0.5.
pub fn white_gaussian(len: usize, rng: &mut fastrand::Rng) -> Vec<f64> {
    const SIGMA: f64 = 0.5;

    // Box-Muller: each pair of uniforms yields two independent normals.
    let mut out = Vec::with_capacity(len + 1);
    while out.len() < len {
        let u1 = rng.f64().max(f64::MIN_POSITIVE);
        let u2 = rng.f64();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = std::f64::consts::TAU * u2;
        out.push(SIGMA * radius * theta.cos());
        out.push(SIGMA * radius * theta.sin());
    }
    out.truncate(len);
    out
}

/// An ambient recording prepared once at startup: the raw take plus a copy
/// with low-frequency rumble removed.
#[derive(Debug, Clone)]
pub struct AmbientNoise {
    raw: SampleBuffer,
    filtered: SampleBuffer,
}

impl AmbientNoise {
    /// Prepares both variants. The zero-phase high-pass runs here, once,
    /// so sourcing noise for a mix is just a prefix copy.
    pub fn prepare(recording: SampleBuffer, cutoff_hz: f64) -> Self {
        let mut filtered = recording.clone();
        filter::zero_phase(&mut filtered.samples, cutoff_hz, filtered.sample_rate);
        Self {
            raw: recording,
            filtered,
        }
    }

    pub fn raw_prefix(&self, len: usize) -> Result<Vec<f64>> {
        prefix(&self.raw.samples, len)
    }

    pub fn filtered_prefix(&self, len: usize) -> Result<Vec<f64>> {
        prefix(&self.filtered.samples, len)
    }
}

fn prefix(samples: &[f64], len: usize) -> Result<Vec<f64>> {
    samples
        .get(..len)
        .map(<[f64]>::to_vec)
        .ok_or(Error::InsufficientNoiseLength {
            needed: len,
            available: samples.len(),
        })
}
