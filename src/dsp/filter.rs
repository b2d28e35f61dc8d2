//! First-order high-pass filter for ambient-noise conditioning.

use std::f64::consts::PI;

/*
| stage            | what it does                             | phase      |
| ---------------- | ---------------------------------------- | ---------- |
| forward pass     | rejects below cutoff, smears phase       | causal     |
| backward pass    | same response, opposite phase smear      | anticausal |
| both (zero_phase)| squared magnitude response, no phase lag | zero       |

Recorded ambient noise carries low-frequency rumble (wind on the mic,
handling noise) that would dominate the power measurement without being
audible at the levels the mixer works at. A single first-order section
at ~128 Hz is enough to strip it.
*/

/// One-pole, one-zero high-pass (first-order Butterworth via the bilinear
/// transform).
pub struct HighPass {
    pub cutoff_hz: f64,
    x1: f64, // previous input
    y1: f64, // previous output
}

impl HighPass {
    pub fn new(cutoff_hz: f64) -> Self {
        Self {
            cutoff_hz,
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Filter a buffer in-place, carrying state across calls.
    pub fn process(&mut self, buffer: &mut [f64], sample_rate: u32) {
        // Bilinear transform with frequency prewarping.
        let k = (PI * self.cutoff_hz / sample_rate as f64).tan();
        let b0 = 1.0 / (1.0 + k);
        let b1 = -b0;
        let a1 = (k - 1.0) / (k + 1.0);

        for sample in buffer.iter_mut() {
            let x = *sample;
            let y = b0 * x + b1 * self.x1 - a1 * self.y1;
            self.x1 = x;
            self.y1 = y;
            *sample = y;
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

/// Run the high-pass forward then backward over the buffer so the passband
/// keeps its phase (the offline equivalent of a zero-phase filter).
pub fn zero_phase(buffer: &mut [f64], cutoff_hz: f64, sample_rate: u32) {
    let mut filter = HighPass::new(cutoff_hz);
    filter.process(buffer, sample_rate);

    buffer.reverse();
    filter.reset();
    filter.process(buffer, sample_rate);
    buffer.reverse();
}
