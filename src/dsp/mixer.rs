//! SNR / noise-fraction mixing and renormalization.

/*
Power-ratio mixing
==================

Vocabulary
----------

  SNR            Signal-to-noise ratio: 10·log10(P_signal / P_noise) in dB.
                 0 dB means equal power, positive means signal dominates.

  noise fraction The share of the mixture's component power contributed by
                 noise, in [0, 1]. Related to SNR by
                     snr_db = 10·log10((1 - f) / f)
                 so f = 0.5 is 0 dB, f → 0 is +inf dB, f → 1 is -inf dB.

  reference power
                 The calibration level every final mixture is rescaled to,
                 so augmented datasets are loudness-matched regardless of
                 how hot the inputs were.

The algorithm
-------------

  1. Measure P_signal and P_noise.
  2. Scale the noise by k = sqrt((P_signal / P_noise) · 10^(-snr/10)),
     which pins 10·log10(P_signal / (k²·P_noise)) to exactly snr dB.
  3. Sum signal and scaled noise sample-wise.
  4. Rescale the sum so its average power equals the reference power.

Reported fractions come from the scaled COMPONENT powers,

    noise_fraction = k²·P_noise / (P_signal + k²·P_noise)

not from the power of the sum. The sum picks up a cross-term from
signal/noise correlation that breaks the exact snr ↔ fraction round trip;
the component form is invariant under step 4 and makes mode B with
fraction f report exactly f back.
*/

use crate::config::MixerConfig;
use crate::error::{Error, Result};
use crate::io::SampleBuffer;

use super::noise::{white_gaussian, white_uniform, AmbientNoise, NoiseKind};
use super::power;

/// How the caller pins the signal/noise balance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixMode {
    /// Explicit signal-to-noise ratio in dB.
    Ratio { snr_db: f64 },
    /// Target noise-power fraction in [0, 1].
    Fraction { noise: f64 },
}

/// One mixing job: which noise, how much of it, and an optional RNG seed
/// for reproducible stochastic kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixRequest {
    pub kind: NoiseKind,
    pub mode: MixMode,
    pub seed: Option<u64>,
}

/// What ended up in the mixture, measured after renormalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerReport {
    /// Share of component power contributed by noise, in [0, 1].
    pub noise_fraction: f64,
    /// Complement of `noise_fraction`.
    pub signal_fraction: f64,
    /// Average power of the scaled noise after renormalization.
    pub noise_power: f64,
    /// Average power of the scaled signal after renormalization.
    pub signal_power: f64,
    /// Effective SNR in dB; ±inf at the all-signal/all-noise boundaries.
    pub snr_db: f64,
}

/// A freshly allocated mixture plus its power report.
#[derive(Debug, Clone)]
pub struct MixOutput {
    pub mixture: SampleBuffer,
    pub report: PowerReport,
}

/// The power-ratio mixing engine.
///
/// Holds only its configuration and the (optional) prepared ambient bank;
/// it never retains references to input buffers, and every call returns a
/// newly allocated output.
pub struct Mixer {
    reference_power: f64,
    ambient: Option<AmbientNoise>,
}

impl Mixer {
    /// A mixer without an ambient recording; the recorded noise kinds will
    /// fail until one is supplied via [`Mixer::with_ambient`].
    pub fn new(config: MixerConfig) -> Self {
        Self {
            reference_power: config.reference_power,
            ambient: None,
        }
    }

    /// A mixer with an ambient recording. The filtered variant is prepared
    /// here, once, at the configured cutoff.
    pub fn with_ambient(config: MixerConfig, recording: SampleBuffer) -> Self {
        Self {
            reference_power: config.reference_power,
            ambient: Some(AmbientNoise::prepare(recording, config.highpass_cutoff_hz)),
        }
    }

    /// Combine `signal` with the requested noise under the requested power
    /// ratio, renormalized to the reference power.
    pub fn mix(&self, signal: &SampleBuffer, request: &MixRequest) -> Result<MixOutput> {
        if signal.is_empty() {
            return Err(Error::EmptySignal);
        }

        if let MixMode::Fraction { noise } = request.mode {
            if noise.is_nan() || !(0.0..=1.0).contains(&noise) {
                return Err(Error::InvalidFraction(noise));
            }
        }

        // All signal: no noise is sourced at all.
        match request.mode {
            MixMode::Fraction { noise } if noise == 0.0 => return self.all_signal(signal),
            MixMode::Ratio { snr_db } if snr_db == f64::INFINITY => {
                return self.all_signal(signal)
            }
            _ => {}
        }

        let mut rng = match request.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let noise = self.source_noise(request.kind, signal.len(), &mut rng)?;

        match request.mode {
            MixMode::Fraction { noise: f } if f == 1.0 => {
                self.all_noise(noise, signal.sample_rate)
            }
            MixMode::Fraction { noise: f } => {
                let snr_db = 10.0 * ((1.0 - f) / f).log10();
                self.blend(signal, noise, snr_db)
            }
            MixMode::Ratio { snr_db } if snr_db == f64::NEG_INFINITY => {
                self.all_noise(noise, signal.sample_rate)
            }
            MixMode::Ratio { snr_db } => self.blend(signal, noise, snr_db),
        }
    }

    fn source_noise(
        &self,
        kind: NoiseKind,
        len: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<Vec<f64>> {
        match kind {
            NoiseKind::Uniform => Ok(white_uniform(len, rng)),
            NoiseKind::Gaussian => Ok(white_gaussian(len, rng)),
            NoiseKind::RecordedRaw => self.ambient()?.raw_prefix(len),
            NoiseKind::RecordedFiltered => self.ambient()?.filtered_prefix(len),
        }
    }

    fn ambient(&self) -> Result<&AmbientNoise> {
        self.ambient.as_ref().ok_or(Error::AmbientMissing)
    }

    /// The non-degenerate path: scale noise to the target SNR, sum,
    /// renormalize.
    fn blend(&self, signal: &SampleBuffer, mut noise: Vec<f64>, snr_db: f64) -> Result<MixOutput> {
        let p_signal = power::average_power(&signal.samples);
        let p_noise = power::average_power(&noise);
        if p_signal == 0.0 || p_noise == 0.0 {
            return Err(Error::ZeroPowerSource);
        }

        let k = ((p_signal / p_noise) * 10f64.powf(-snr_db / 10.0)).sqrt();
        power::apply_gain(&mut noise, k);
        let p_scaled_noise = k * k * p_noise;

        let mut mixed = signal.samples.clone();
        power::sum_in_place(&mut mixed, &noise);

        let p_mixed = power::average_power(&mixed);
        if p_mixed == 0.0 {
            // Signal and noise cancelled exactly; nothing to renormalize.
            return Err(Error::ZeroPowerSource);
        }
        let rescale = power::rescale_to_power(&mut mixed, self.reference_power);

        let noise_fraction = p_scaled_noise / (p_signal + p_scaled_noise);
        let report = PowerReport {
            noise_fraction,
            signal_fraction: 1.0 - noise_fraction,
            noise_power: p_scaled_noise * rescale * rescale,
            signal_power: p_signal * rescale * rescale,
            snr_db,
        };

        Ok(MixOutput {
            mixture: SampleBuffer::new(mixed, signal.sample_rate),
            report,
        })
    }

    /// Degenerate fraction 1.0: the mixture is the noise itself, rescaled.
    fn all_noise(&self, mut noise: Vec<f64>, sample_rate: u32) -> Result<MixOutput> {
        if power::average_power(&noise) == 0.0 {
            return Err(Error::ZeroPowerSource);
        }
        power::rescale_to_power(&mut noise, self.reference_power);

        Ok(MixOutput {
            mixture: SampleBuffer::new(noise, sample_rate),
            report: PowerReport {
                noise_fraction: 1.0,
                signal_fraction: 0.0,
                noise_power: self.reference_power,
                signal_power: 0.0,
                snr_db: f64::NEG_INFINITY,
            },
        })
    }

    /// Degenerate fraction 0.0: the mixture is the signal itself, rescaled.
    fn all_signal(&self, signal: &SampleBuffer) -> Result<MixOutput> {
        if power::average_power(&signal.samples) == 0.0 {
            return Err(Error::ZeroPowerSource);
        }
        let mut mixed = signal.samples.clone();
        power::rescale_to_power(&mut mixed, self.reference_power);

        Ok(MixOutput {
            mixture: SampleBuffer::new(mixed, signal.sample_rate),
            report: PowerReport {
                noise_fraction: 0.0,
                signal_fraction: 1.0,
                noise_power: 0.0,
                signal_power: self.reference_power,
                snr_db: f64::INFINITY,
            },
        })
    }
}
