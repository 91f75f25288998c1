//! Filter instance registry
//!
//! The registry is the sole owner of every configured effect. Hosts hold an
//! opaque [`FilterHandle`]; a handle that was never issued or has been
//! released is reported as [`BoostError::UseAfterRelease`] instead of
//! touching freed state.
//!
//! Lifecycle per handle: configure -> (set_params | process | reset)* -> release.

use std::collections::HashMap;
use std::fmt;

use super::adapter;
use super::pcm::{SampleEncoding, STEREO_CHANNELS};
use crate::dsp::coefficients::{BiquadCoefficients, BoostParams};
use crate::dsp::effect::{AudioEffect, Effect, EffectKind, GainReduction};
use crate::error::{BoostError, Result};

/// Opaque token identifying a configured instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterHandle(u64);

impl FilterHandle {
    /// Raw token for passing across a host boundary
    pub fn token(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from a token received from the host
    pub fn from_token(token: u64) -> Self {
        Self(token)
    }
}

impl fmt::Display for FilterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-handle state owned by the registry
#[derive(Debug)]
struct Slot {
    effect: AudioEffect,
    sample_rate: u32,
    bytes_per_frame: usize,
}

/// Owner of all live filter instances
#[derive(Debug)]
pub struct FilterRegistry {
    kind: EffectKind,
    reduction_gain: f32,
    slots: HashMap<FilterHandle, Slot>,
    next_token: u64,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(EffectKind::default())
    }
}

impl FilterRegistry {
    /// Create a registry that configures `kind` instances
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            reduction_gain: crate::dsp::effect::DEFAULT_REDUCTION_GAIN,
            slots: HashMap::new(),
            next_token: 1,
        }
    }

    /// Linear gain used when configuring gain-reduction instances
    pub fn with_reduction_gain(mut self, gain: f32) -> Self {
        self.reduction_gain = gain;
        self
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, handle: FilterHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    /// Create an instance for a stereo stream
    ///
    /// Boost instances start with neutral coefficients and zeroed history.
    pub fn configure(
        &mut self,
        sample_rate: u32,
        channel_count: u16,
        bytes_per_frame: usize,
    ) -> Result<FilterHandle> {
        if sample_rate == 0 {
            return Err(BoostError::invalid("sample rate must be positive"));
        }
        if channel_count as usize != STEREO_CHANNELS {
            return Err(BoostError::invalid(format!(
                "{} channels requested, only stereo is supported",
                channel_count
            )));
        }
        if SampleEncoding::from_bytes_per_frame(bytes_per_frame).is_none() {
            return Err(BoostError::invalid(format!(
                "{} bytes per frame matches neither PCM16 nor float stereo",
                bytes_per_frame
            )));
        }

        let effect = match self.kind {
            EffectKind::GainReduction => {
                AudioEffect::GainReduction(GainReduction::new(self.reduction_gain))
            }
            kind => AudioEffect::new(kind, sample_rate),
        };

        let handle = FilterHandle(self.next_token);
        self.next_token += 1;
        self.slots.insert(
            handle,
            Slot {
                effect,
                sample_rate,
                bytes_per_frame,
            },
        );
        log::debug!(
            "Configured {} {} at {} Hz, {} bytes/frame",
            self.kind_name(),
            handle,
            sample_rate,
            bytes_per_frame
        );
        Ok(handle)
    }

    /// Recompute coefficients for both channels, keeping their history
    pub fn set_params(
        &mut self,
        handle: FilterHandle,
        sample_rate: u32,
        params: BoostParams,
    ) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        slot.effect.set_params(sample_rate, params)?;
        slot.sample_rate = sample_rate;
        Ok(())
    }

    /// Install fixed coefficients (e.g. a preset) on both channels
    pub fn set_coefficients(
        &mut self,
        handle: FilterHandle,
        coeffs: BiquadCoefficients,
    ) -> Result<()> {
        self.slot_mut(handle)?.effect.set_coefficients(coeffs)
    }

    /// Process one host buffer; see [`adapter::process`]
    pub fn process(
        &mut self,
        handle: FilterHandle,
        input: &[u8],
        output: &mut [u8],
        position: i64,
        limit: i64,
        encoding: i32,
    ) -> Result<usize> {
        let slot = self.slot_mut(handle)?;
        adapter::process(input, output, position, limit, encoding, &mut slot.effect)
    }

    /// Zero the filter history of an instance
    pub fn reset(&mut self, handle: FilterHandle) -> Result<()> {
        self.slot_mut(handle)?.effect.reset();
        log::debug!("Reset {}", handle);
        Ok(())
    }

    /// Enable or bypass an instance
    pub fn set_enabled(&mut self, handle: FilterHandle, enabled: bool) -> Result<()> {
        self.slot_mut(handle)?.effect.set_enabled(enabled);
        Ok(())
    }

    /// Free an instance; the handle is invalid afterwards
    pub fn release(&mut self, handle: FilterHandle) -> Result<()> {
        match self.slots.remove(&handle) {
            Some(_) => {
                log::debug!("Released {}", handle);
                Ok(())
            }
            None => Err(Self::released(handle)),
        }
    }

    /// Borrow the effect behind a handle
    pub fn get(&self, handle: FilterHandle) -> Result<&AudioEffect> {
        self.slots
            .get(&handle)
            .map(|slot| &slot.effect)
            .ok_or_else(|| Self::released(handle))
    }

    /// Sample rate the instance was configured or last updated with
    pub fn sample_rate(&self, handle: FilterHandle) -> Result<u32> {
        self.slots
            .get(&handle)
            .map(|slot| slot.sample_rate)
            .ok_or_else(|| Self::released(handle))
    }

    /// Frame width the instance was configured with
    pub fn bytes_per_frame(&self, handle: FilterHandle) -> Result<usize> {
        self.slots
            .get(&handle)
            .map(|slot| slot.bytes_per_frame)
            .ok_or_else(|| Self::released(handle))
    }

    fn slot_mut(&mut self, handle: FilterHandle) -> Result<&mut Slot> {
        self.slots
            .get_mut(&handle)
            .ok_or_else(|| Self::released(handle))
    }

    fn released(handle: FilterHandle) -> BoostError {
        log::warn!("Operation on released or unknown handle {}", handle);
        BoostError::UseAfterRelease { handle: handle.0 }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            EffectKind::GainReduction => "gain reduction",
            EffectKind::BassBoost => "bass boost",
            EffectKind::ChannelSwap => "channel swap",
        }
    }
}
