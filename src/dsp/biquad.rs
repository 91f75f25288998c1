//! Biquad state machine
//!
//! One second-order IIR section per audio channel. History persists across
//! buffers; it is loaded into locals on entry and stored back once on exit.

use super::coefficients::BiquadCoefficients;
use super::sample::PcmSample;

/// Last two inputs and outputs of one channel, in the normalized domain
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadHistory {
    pub x1: f32, // x[n-1]
    pub x2: f32, // x[n-2]
    pub y1: f32, // y[n-1]
    pub y2: f32, // y[n-2]
}

impl BiquadHistory {
    /// True when no signal has passed through yet (or after a reset)
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Second-order IIR section for one channel
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadSection {
    coeffs: BiquadCoefficients,
    history: BiquadHistory,
}

impl BiquadSection {
    /// Create a section with zeroed history
    pub fn new(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            history: BiquadHistory::default(),
        }
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    pub fn history(&self) -> &BiquadHistory {
        &self.history
    }

    /// Swap in new coefficients; history is kept so the change is immediate
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Zero the history
    pub fn reset(&mut self) {
        self.history = BiquadHistory::default();
    }

    /// Filter normalized float samples in place
    pub fn filter_f32(&mut self, samples: &mut [f32]) {
        self.filter(samples);
    }

    /// Filter 16-bit samples in place, saturating on the way out
    pub fn filter_i16(&mut self, samples: &mut [i16]) {
        self.filter(samples);
    }

    /// Run the recurrence over a contiguous run of one channel's samples
    ///
    /// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] + a1*y[n-1] + a2*y[n-2]
    pub fn filter<T: PcmSample>(&mut self, samples: &mut [T]) {
        let BiquadCoefficients { b0, b1, b2, a1, a2 } = self.coeffs;
        let BiquadHistory {
            mut x1,
            mut x2,
            mut y1,
            mut y2,
        } = self.history;

        for sample in samples.iter_mut() {
            let x0 = sample.to_normalized();
            let y0 = b0 * x0 + b1 * x1 + b2 * x2 + a1 * y1 + a2 * y2;

            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;

            *sample = T::from_normalized(y0);
        }

        self.history = BiquadHistory { x1, x2, y1, y2 };
    }
}
