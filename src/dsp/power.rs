//! Average-power measurement and gain primitives.

/*
Power, not amplitude
====================

Loudness matching works on power, the mean of squared samples:

    P(x) = (1/N) · Σ x[i]²

Two buffers with equal peak amplitude can differ wildly in power (a sparse
click vs. dense noise), so every ratio in the mixer is expressed in power
terms and converted to an amplitude gain only at the last moment, via a
square root:

    gain = sqrt(P_target / P_current)

Scaling amplitude by g scales power by g², which is why the square root
appears in every rescale below.
*/

/// Average power of a buffer: mean of squared samples.
///
/// Returns 0.0 for an empty buffer; callers that cannot tolerate that
/// (the mixer) reject empty input before measuring.
#[inline]
pub fn average_power(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64
}

/// Multiply every sample by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(samples: &mut [f64], gain: f64) {
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
}

/// Add `other` into `samples` element-wise (summing, no weighting).
///
/// The sum can exceed [-1.0, +1.0]; the mixer renormalizes afterwards.
#[inline]
pub fn sum_in_place(samples: &mut [f64], other: &[f64]) {
    debug_assert_eq!(samples.len(), other.len());

    for (s, &o) in samples.iter_mut().zip(other.iter()) {
        *s += o;
    }
}

/// Scale a buffer so its average power becomes `target`. Returns the gain
/// that was applied.
///
/// A zero-power buffer cannot be rescaled; callers check before calling.
#[inline]
pub fn rescale_to_power(samples: &mut [f64], target: f64) -> f64 {
    let gain = (target / average_power(samples)).sqrt();
    apply_gain(samples, gain);
    gain
}
