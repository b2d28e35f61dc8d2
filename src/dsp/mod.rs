//! Signal-processing core: power measurement, noise synthesis, and the
//! power-ratio mixing engine.
//!
//! These components stay focused on the arithmetic. File discovery and
//! codec glue live in [`crate::io`], so the mixer remains a pure function
//! of its inputs, its configuration, and (for the stochastic noise kinds)
//! a caller-seedable random source.

/// First-order high-pass filter with zero-phase application.
pub mod filter;
/// SNR / noise-fraction mixing and renormalization.
pub mod mixer;
/// Noise kinds, white-noise generators, and the prepared ambient bank.
pub mod noise;
/// Average-power measurement and gain primitives.
pub mod power;

pub use mixer::{MixMode, MixOutput, MixRequest, Mixer, PowerReport};
pub use noise::{AmbientNoise, NoiseKind};
