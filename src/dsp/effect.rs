//! Effect strategies
//!
//! Every strategy processes interleaved stereo PCM behind the [`Effect`]
//! trait, either in place on typed samples or from host bytes to host
//! bytes. [`AudioEffect`] is the selectable wrapper a host configures once
//! per stream.

use super::biquad::BiquadSection;
use super::coefficients::{BiquadCoefficients, BoostParams};
use super::sample::PcmSample;
use crate::engine::adapter;
use crate::engine::pcm::STEREO_CHANNELS;
use crate::error::{BoostError, Result};
use serde::{Deserialize, Serialize};

/// Default linear gain of the reduction strategy (-6 dB)
pub const DEFAULT_REDUCTION_GAIN: f32 = 0.5;

/// In-place processor for interleaved stereo PCM
pub trait Effect {
    /// Process interleaved `[L, R, L, R, ...]` samples in place
    fn process<T: PcmSample>(&mut self, interleaved: &mut [T]) -> Result<()>;

    /// Process little-endian interleaved samples from `src` into `dst`
    ///
    /// Both slices hold whole stereo frames of `T` and have the same length.
    /// `dst` is untouched when an error is returned.
    fn process_bytes<T: PcmSample>(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()>;

    /// Clear any internal state (filter history)
    fn reset(&mut self);

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &'static str;

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Enable or disable the effect
    fn set_enabled(&mut self, enabled: bool);
}

/// Helper macro to implement the bookkeeping methods of [`Effect`]
#[macro_export]
macro_rules! impl_effect_common {
    ($effect_type:expr, $display_name:expr) => {
        fn effect_type(&self) -> &'static str {
            $effect_type
        }

        fn display_name(&self) -> &'static str {
            $display_name
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
    };
}

// ============================================================================
// Effect Kind
// ============================================================================

/// Strategy selector used by configuration and the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Flat linear gain
    GainReduction,
    /// Stereo biquad boost
    #[default]
    BassBoost,
    /// Left/right exchange
    ChannelSwap,
}

impl std::str::FromStr for EffectKind {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gain-reduction" | "gain_reduction" => Ok(EffectKind::GainReduction),
            "bass-boost" | "bass_boost" => Ok(EffectKind::BassBoost),
            "channel-swap" | "channel_swap" => Ok(EffectKind::ChannelSwap),
            other => Err(BoostError::invalid(format!("unknown effect '{}'", other))),
        }
    }
}

// ============================================================================
// Gain Reduction
// ============================================================================

/// Stateless loudness reducer
///
/// PCM16 products are truncated toward zero and saturated; float products
/// are clamped to [-1, 1].
#[derive(Debug, Clone)]
pub struct GainReduction {
    gain: f32,
    enabled: bool,
}

impl GainReduction {
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            enabled: true,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for GainReduction {
    fn default() -> Self {
        Self::new(DEFAULT_REDUCTION_GAIN)
    }
}

impl Effect for GainReduction {
    impl_effect_common!("gain-reduction", "Gain Reduction");

    fn process<T: PcmSample>(&mut self, interleaved: &mut [T]) -> Result<()> {
        for sample in interleaved.iter_mut() {
            *sample = sample.apply_gain(self.gain);
        }
        Ok(())
    }

    fn process_bytes<T: PcmSample>(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        check_byte_lengths::<T>(src, dst)?;
        let width = T::ENCODING.bytes_per_sample();
        for (s, d) in src.chunks_exact(width).zip(dst.chunks_exact_mut(width)) {
            T::read_le(s).apply_gain(self.gain).write_le(d);
        }
        Ok(())
    }

    fn reset(&mut self) {
        // No internal state to reset
    }
}

// ============================================================================
// Channel Swap
// ============================================================================

/// Stateless stereo processor exchanging left and right
#[derive(Debug, Clone)]
pub struct ChannelSwap {
    enabled: bool,
}

impl ChannelSwap {
    pub fn new() -> Self {
        Self { enabled: true }
    }
}

impl Default for ChannelSwap {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ChannelSwap {
    impl_effect_common!("channel-swap", "Channel Swap");

    fn process<T: PcmSample>(&mut self, interleaved: &mut [T]) -> Result<()> {
        if interleaved.len() % STEREO_CHANNELS != 0 {
            return Err(BoostError::invalid(format!(
                "odd sample count {} for interleaved stereo",
                interleaved.len()
            )));
        }
        for frame in interleaved.chunks_exact_mut(STEREO_CHANNELS) {
            frame.swap(0, 1);
        }
        Ok(())
    }

    fn process_bytes<T: PcmSample>(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        check_byte_lengths::<T>(src, dst)?;
        let width = T::ENCODING.bytes_per_sample();
        for (s, d) in src
            .chunks_exact(width * STEREO_CHANNELS)
            .zip(dst.chunks_exact_mut(width * STEREO_CHANNELS))
        {
            d[..width].copy_from_slice(&s[width..]);
            d[width..].copy_from_slice(&s[..width]);
        }
        Ok(())
    }

    fn reset(&mut self) {}
}

/// Both slices must hold the same whole number of stereo frames
fn check_byte_lengths<T: PcmSample>(src: &[u8], dst: &[u8]) -> Result<()> {
    let frame = T::ENCODING.bytes_per_frame();
    if src.len() % frame != 0 || dst.len() != src.len() {
        return Err(BoostError::invalid(format!(
            "{} input bytes and {} output bytes are not matching {} stereo frames",
            src.len(),
            dst.len(),
            T::ENCODING
        )));
    }
    Ok(())
}

// ============================================================================
// Filter Instance
// ============================================================================

/// Stereo bass-boost filter: one biquad per channel, shared coefficients
#[derive(Debug, Clone)]
pub struct FilterInstance {
    left: BiquadSection,
    right: BiquadSection,
    sample_rate: u32,
    params: Option<BoostParams>,
    /// Set when the last parameter update was rejected
    fault: Option<String>,
    enabled: bool,
    /// Planar normalized samples, reused across calls
    scratch: Vec<f32>,
}

impl FilterInstance {
    /// Create an instance with neutral coefficients and zeroed history
    pub fn new(sample_rate: u32) -> Self {
        Self {
            left: BiquadSection::default(),
            right: BiquadSection::default(),
            sample_rate,
            params: None,
            fault: None,
            enabled: true,
            scratch: Vec::new(),
        }
    }

    /// Create an instance and apply parameters immediately
    pub fn with_params(sample_rate: u32, params: BoostParams) -> Result<Self> {
        let mut instance = Self::new(sample_rate);
        instance.set_params(sample_rate, params)?;
        Ok(instance)
    }

    /// Redesign both channels' coefficients
    ///
    /// History is left as is, so the new curve applies from the next sample.
    /// Non-finite coefficients are rejected and the instance refuses to
    /// process until a valid update arrives.
    pub fn set_params(&mut self, sample_rate: u32, params: BoostParams) -> Result<()> {
        self.apply_coefficients(params.design(sample_rate))?;
        self.sample_rate = sample_rate;
        self.params = Some(params);
        log::debug!(
            "Boost set to {:.1} dB at {} Hz, Q {} ({} Hz)",
            params.gain_db(),
            params.frequency_hz,
            params.q,
            sample_rate
        );
        Ok(())
    }

    /// Install precomputed coefficients (e.g. a preset) on both channels
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) -> Result<()> {
        self.apply_coefficients(coeffs)?;
        self.params = None;
        Ok(())
    }

    fn apply_coefficients(&mut self, coeffs: BiquadCoefficients) -> Result<()> {
        if let Err(err) = coeffs.validate() {
            log::warn!("Rejecting filter update: {}", err);
            self.fault = Some(err.to_string());
            return Err(err);
        }
        if !coeffs.is_stable() {
            log::warn!("Installing coefficients with marginal poles: {:?}", coeffs);
        }
        self.left.set_coefficients(coeffs);
        self.right.set_coefficients(coeffs);
        self.fault = None;
        Ok(())
    }

    pub fn left(&self) -> &BiquadSection {
        &self.left
    }

    pub fn right(&self) -> &BiquadSection {
        &self.right
    }

    /// Coefficients shared by both channels
    pub fn coefficients(&self) -> &BiquadCoefficients {
        self.left.coefficients()
    }

    /// Parameters of the last successful update, if designed from parameters
    pub fn params(&self) -> Option<&BoostParams> {
        self.params.as_ref()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// True after a rejected parameter update
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    fn check_fault(&self) -> Result<()> {
        match &self.fault {
            Some(details) => Err(BoostError::NumericInstability {
                details: details.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Effect for FilterInstance {
    impl_effect_common!("bass-boost", "Bass Boost");

    fn process<T: PcmSample>(&mut self, interleaved: &mut [T]) -> Result<()> {
        self.check_fault()?;
        adapter::filter_stereo(interleaved, &mut self.left, &mut self.right, &mut self.scratch)
    }

    fn process_bytes<T: PcmSample>(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check_fault()?;
        adapter::filter_stereo_bytes::<T>(
            src,
            dst,
            &mut self.left,
            &mut self.right,
            &mut self.scratch,
        )
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

// ============================================================================
// Audio Effect
// ============================================================================

/// The strategy chosen for a stream
#[derive(Debug, Clone)]
pub enum AudioEffect {
    GainReduction(GainReduction),
    BassBoost(FilterInstance),
    ChannelSwap(ChannelSwap),
}

impl AudioEffect {
    /// Build the default instance of a strategy
    pub fn new(kind: EffectKind, sample_rate: u32) -> Self {
        match kind {
            EffectKind::GainReduction => AudioEffect::GainReduction(GainReduction::default()),
            EffectKind::BassBoost => AudioEffect::BassBoost(FilterInstance::new(sample_rate)),
            EffectKind::ChannelSwap => AudioEffect::ChannelSwap(ChannelSwap::new()),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            AudioEffect::GainReduction(_) => EffectKind::GainReduction,
            AudioEffect::BassBoost(_) => EffectKind::BassBoost,
            AudioEffect::ChannelSwap(_) => EffectKind::ChannelSwap,
        }
    }

    /// Update boost parameters; strategies without a filter ignore them
    pub fn set_params(&mut self, sample_rate: u32, params: BoostParams) -> Result<()> {
        match self {
            AudioEffect::BassBoost(filter) => filter.set_params(sample_rate, params),
            other => {
                log::debug!("{} ignores boost parameters", other.display_name());
                Ok(())
            }
        }
    }

    /// Install fixed coefficients; ignored by strategies without a filter
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) -> Result<()> {
        match self {
            AudioEffect::BassBoost(filter) => filter.set_coefficients(coeffs),
            _ => Ok(()),
        }
    }

    pub fn as_filter(&self) -> Option<&FilterInstance> {
        match self {
            AudioEffect::BassBoost(filter) => Some(filter),
            _ => None,
        }
    }
}

impl Effect for AudioEffect {
    fn process<T: PcmSample>(&mut self, interleaved: &mut [T]) -> Result<()> {
        match self {
            AudioEffect::GainReduction(gain) => gain.process(interleaved),
            AudioEffect::BassBoost(filter) => filter.process(interleaved),
            AudioEffect::ChannelSwap(swap) => swap.process(interleaved),
        }
    }

    fn process_bytes<T: PcmSample>(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        match self {
            AudioEffect::GainReduction(gain) => gain.process_bytes::<T>(src, dst),
            AudioEffect::BassBoost(filter) => filter.process_bytes::<T>(src, dst),
            AudioEffect::ChannelSwap(swap) => swap.process_bytes::<T>(src, dst),
        }
    }

    fn reset(&mut self) {
        match self {
            AudioEffect::GainReduction(gain) => gain.reset(),
            AudioEffect::BassBoost(filter) => filter.reset(),
            AudioEffect::ChannelSwap(swap) => swap.reset(),
        }
    }

    fn effect_type(&self) -> &'static str {
        match self {
            AudioEffect::GainReduction(gain) => gain.effect_type(),
            AudioEffect::BassBoost(filter) => filter.effect_type(),
            AudioEffect::ChannelSwap(swap) => swap.effect_type(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            AudioEffect::GainReduction(gain) => gain.display_name(),
            AudioEffect::BassBoost(filter) => filter.display_name(),
            AudioEffect::ChannelSwap(swap) => swap.display_name(),
        }
    }

    fn is_enabled(&self) -> bool {
        match self {
            AudioEffect::GainReduction(gain) => gain.is_enabled(),
            AudioEffect::BassBoost(filter) => filter.is_enabled(),
            AudioEffect::ChannelSwap(swap) => swap.is_enabled(),
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        match self {
            AudioEffect::GainReduction(gain) => gain.set_enabled(enabled),
            AudioEffect::BassBoost(filter) => filter.set_enabled(enabled),
            AudioEffect::ChannelSwap(swap) => swap.set_enabled(enabled),
        }
    }
}
