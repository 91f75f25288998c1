//! Coefficient design for the boost filter
//!
//! Turns musical parameters (boost knob, Q, center frequency) into the five
//! normalized biquad coefficients shared by both stereo channels, using the
//! Audio EQ Cookbook formulas.
//! Reference: https://www.w3.org/2011/audio/audio-eq-cookbook.html

use crate::error::{BoostError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Constants
// ============================================================================

/// Boost in dB reached when the gain knob is fully open
pub const DEFAULT_MAX_BOOST_DB: f32 = 21.0;

/// Default center frequency for bass boost
pub const DEFAULT_FREQUENCY_HZ: f32 = 100.0;

/// Default Q (Butterworth-like bandwidth)
pub const DEFAULT_Q: f32 = 0.707;

// ============================================================================
// Filter Shape
// ============================================================================

/// Response shape produced by the designer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterShape {
    /// Bell curve boost around the center frequency
    #[default]
    Peaking,
    /// Boost everything below the corner frequency
    LowShelf,
    /// Boost everything above the corner frequency
    HighShelf,
}

// ============================================================================
// Coefficients
// ============================================================================

/// Normalized biquad coefficients
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 - a1*z^-1 - a2*z^-2)
///
/// `a0` is divided out and the feedback terms are stored negated, so the
/// recurrence is a plain sum of five products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::neutral()
    }
}

impl BiquadCoefficients {
    /// Identity filter: output equals input
    pub const fn neutral() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Build from textbook coefficients with an implicit `a0 = 1`
    ///
    /// `a` holds the denominator terms as they appear in the transfer
    /// function; they are negated here.
    pub fn from_raw(b: [f32; 3], a: [f32; 2]) -> Self {
        Self {
            b0: b[0],
            b1: b[1],
            b2: b[2],
            a1: -a[0],
            a2: -a[1],
        }
    }

    /// Calculate coefficients for the given shape
    ///
    /// # Arguments
    /// * `shape` - Response shape
    /// * `gain_db` - Boost (positive) or cut (negative) in dB
    /// * `q` - Bandwidth, must be > 0
    /// * `frequency_hz` - Center/corner frequency, must be below Nyquist
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// Out-of-range input yields non-finite or unstable coefficients;
    /// use [`BiquadCoefficients::validate`] before filtering with them.
    pub fn design(
        shape: FilterShape,
        gain_db: f64,
        q: f64,
        frequency_hz: f64,
        sample_rate: f64,
    ) -> Self {
        let w0 = 2.0 * PI * frequency_hz / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a = 10.0_f64.powf(gain_db / 40.0);

        let (b0, b1, b2, a0, a1, a2) = match shape {
            FilterShape::Peaking => (
                1.0 + alpha * a,
                -2.0 * cos_w0,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cos_w0,
                1.0 - alpha / a,
            ),
            FilterShape::LowShelf => {
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
            FilterShape::HighShelf => {
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
        };

        // Normalize by a0, negate feedback
        Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (-a1 / a0) as f32,
            a2: (-a2 / a0) as f32,
        }
    }

    /// Check that every coefficient is a finite number
    pub fn is_finite(&self) -> bool {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
            .iter()
            .all(|c| c.is_finite())
    }

    /// Check that both poles lie strictly inside the unit circle
    pub fn is_stable(&self) -> bool {
        // Stability triangle on the textbook denominator terms
        let a1 = -self.a1;
        let a2 = -self.a2;
        a2.abs() < 1.0 && a1.abs() < 1.0 + a2
    }

    /// Reject coefficients that must never reach the filter
    ///
    /// Only non-finite values are refused. Very low centre frequencies put
    /// the poles within f32 rounding of the unit circle, so [`is_stable`]
    /// is diagnostic only.
    ///
    /// [`is_stable`]: BiquadCoefficients::is_stable
    pub fn validate(&self) -> Result<()> {
        if !self.is_finite() {
            return Err(BoostError::NumericInstability {
                details: format!("non-finite coefficients {:?}", self),
            });
        }
        Ok(())
    }

    /// Check if coefficients are the identity filter
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Magnitude response in dB at the given frequency
    pub fn magnitude_db(&self, frequency_hz: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * frequency_hz / sample_rate;
        let (sin_w, cos_w) = w.sin_cos();
        let (sin_2w, cos_2w) = (2.0 * w).sin_cos();
        let (b0, b1, b2) = (self.b0 as f64, self.b1 as f64, self.b2 as f64);
        let (a1, a2) = (self.a1 as f64, self.a2 as f64);

        let num_re = b0 + b1 * cos_w + b2 * cos_2w;
        let num_im = -(b1 * sin_w + b2 * sin_2w);
        let den_re = 1.0 - a1 * cos_w - a2 * cos_2w;
        let den_im = a1 * sin_w + a2 * sin_2w;

        let num = num_re * num_re + num_im * num_im;
        let den = den_re * den_re + den_im * den_im;
        10.0 * (num / den).log10()
    }
}

// ============================================================================
// Boost Parameters
// ============================================================================

/// User-facing boost parameters
///
/// `gain_unit` is a 0..1 knob scaled by `max_boost_db`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostParams {
    pub gain_unit: f32,
    pub frequency_hz: f32,
    pub q: f32,
    pub max_boost_db: f32,
    #[serde(default)]
    pub shape: FilterShape,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            gain_unit: 1.0,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            q: DEFAULT_Q,
            max_boost_db: DEFAULT_MAX_BOOST_DB,
            shape: FilterShape::Peaking,
        }
    }
}

impl BoostParams {
    /// Create peaking boost parameters with the default maximum boost
    pub fn new(gain_unit: f32, frequency_hz: f32, q: f32) -> Self {
        Self {
            gain_unit,
            frequency_hz,
            q,
            ..Default::default()
        }
    }

    /// Boost in dB; the knob is clamped to [0, 1]
    pub fn gain_db(&self) -> f32 {
        self.max_boost_db * self.gain_unit.clamp(0.0, 1.0)
    }

    /// Design coefficients for the given sample rate
    pub fn design(&self, sample_rate: u32) -> BiquadCoefficients {
        BiquadCoefficients::design(
            self.shape,
            self.gain_db() as f64,
            self.q as f64,
            self.frequency_hz as f64,
            sample_rate as f64,
        )
    }
}

/// Design peaking boost coefficients with the default 21 dB ceiling
pub fn design_boost(
    gain_unit: f32,
    q: f32,
    frequency_hz: f32,
    sample_rate: u32,
) -> BiquadCoefficients {
    BoostParams::new(gain_unit, frequency_hz, q).design(sample_rate)
}

// ============================================================================
// Presets
// ============================================================================

/// Fixed low-frequency boost curves, labelled by their nominal boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostPreset {
    Boost6Db,
    Boost9Db,
    Boost12Db,
}

impl BoostPreset {
    /// Coefficients of the preset curve
    pub fn coefficients(self) -> BiquadCoefficients {
        match self {
            BoostPreset::Boost6Db => BiquadCoefficients::from_raw(
                [1.003_152_59, -1.984_682_43, 0.981_760_338],
                [-1.984_739_92, 0.984_855_443],
            ),
            BoostPreset::Boost9Db => BiquadCoefficients::from_raw(
                [1.005_306_46, -1.986_300_07, 0.981_284_028],
                [-1.986_399_36, 0.986_491_195],
            ),
            BoostPreset::Boost12Db => BiquadCoefficients::from_raw(
                [1.005_887_50, -1.988_100_28, 0.982_488_082],
                [-1.988_203_36, 0.988_272_509],
            ),
        }
    }

    /// Nominal low-frequency boost in dB
    pub fn nominal_db(self) -> f32 {
        match self {
            BoostPreset::Boost6Db => 6.0,
            BoostPreset::Boost9Db => 9.0,
            BoostPreset::Boost12Db => 12.0,
        }
    }
}
