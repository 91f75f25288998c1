//! Effect configuration
//!
//! A stream's effect setup as a JSON document. Every field has a default, so
//! a partial file such as `{"gain_unit": 0.5}` is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::coefficients::{
    BoostParams, FilterShape, DEFAULT_FREQUENCY_HZ, DEFAULT_MAX_BOOST_DB, DEFAULT_Q,
};
use crate::dsp::effect::{
    AudioEffect, ChannelSwap, EffectKind, FilterInstance, GainReduction, DEFAULT_REDUCTION_GAIN,
};
use crate::engine::registry::FilterRegistry;
use crate::error::{BoostError, Result};

/// Default stream sample rate
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Serializable configuration for one effect chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Which strategy to run
    pub effect: EffectKind,
    /// Sample rate in Hz used for coefficient design
    pub sample_rate: u32,
    /// Boost knob (0..1)
    pub gain_unit: f32,
    /// Center frequency in Hz
    pub frequency_hz: f32,
    /// Bandwidth
    pub q: f32,
    /// Boost in dB at `gain_unit = 1`
    pub max_boost_db: f32,
    pub shape: FilterShape,
    /// Linear gain of the reduction strategy
    pub reduction_gain: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            effect: EffectKind::BassBoost,
            sample_rate: DEFAULT_SAMPLE_RATE,
            gain_unit: 1.0,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            q: DEFAULT_Q,
            max_boost_db: DEFAULT_MAX_BOOST_DB,
            shape: FilterShape::Peaking,
            reduction_gain: DEFAULT_REDUCTION_GAIN,
        }
    }
}

impl BoostConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON configuration string
    pub fn from_json(text: &str) -> Result<Self> {
        let config: BoostConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check all values are within their usable ranges
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(BoostError::invalid("sample_rate must be positive"));
        }
        if !(0.0..=1.0).contains(&self.gain_unit) {
            return Err(BoostError::invalid(format!(
                "gain_unit {} outside 0..1",
                self.gain_unit
            )));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !(self.frequency_hz > 0.0 && self.frequency_hz < nyquist) {
            return Err(BoostError::invalid(format!(
                "frequency_hz {} outside (0, {})",
                self.frequency_hz, nyquist
            )));
        }
        if !(self.q > 0.0 && self.q.is_finite()) {
            return Err(BoostError::invalid(format!("q {} must be positive", self.q)));
        }
        if !(self.max_boost_db >= 0.0 && self.max_boost_db.is_finite()) {
            return Err(BoostError::invalid(format!(
                "max_boost_db {} must be a non-negative number",
                self.max_boost_db
            )));
        }
        if !(0.0..=1.0).contains(&self.reduction_gain) {
            return Err(BoostError::invalid(format!(
                "reduction_gain {} outside 0..1",
                self.reduction_gain
            )));
        }
        Ok(())
    }

    /// Boost parameters carried by this configuration
    pub fn boost_params(&self) -> BoostParams {
        BoostParams {
            gain_unit: self.gain_unit,
            frequency_hz: self.frequency_hz,
            q: self.q,
            max_boost_db: self.max_boost_db,
            shape: self.shape,
        }
    }

    /// Build a caller-owned effect for this configuration
    pub fn build_effect(&self) -> Result<AudioEffect> {
        self.validate()?;
        Ok(match self.effect {
            EffectKind::GainReduction => {
                AudioEffect::GainReduction(GainReduction::new(self.reduction_gain))
            }
            EffectKind::BassBoost => AudioEffect::BassBoost(FilterInstance::with_params(
                self.sample_rate,
                self.boost_params(),
            )?),
            EffectKind::ChannelSwap => AudioEffect::ChannelSwap(ChannelSwap::new()),
        })
    }

    /// Build a registry configuring instances of this effect kind
    pub fn build_registry(&self) -> FilterRegistry {
        FilterRegistry::new(self.effect).with_reduction_gain(self.reduction_gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::effect::Effect;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoostConfig::default();
        config.validate().unwrap();
        assert_eq!(config.boost_params(), BoostParams::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BoostConfig::from_json(r#"{"gain_unit": 0.5, "shape": "low_shelf"}"#).unwrap();
        assert_eq!(config.gain_unit, 0.5);
        assert_eq!(config.shape, FilterShape::LowShelf);
        assert_eq!(config.frequency_hz, DEFAULT_FREQUENCY_HZ);
        assert_eq!(config.effect, EffectKind::BassBoost);
    }

    #[test]
    fn test_json_round_trip() {
        let config = BoostConfig {
            effect: EffectKind::GainReduction,
            reduction_gain: 0.25,
            ..Default::default()
        };
        let text = config.to_json().unwrap();
        assert!(text.contains("\"gain_reduction\""));
        assert_eq!(BoostConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad = [
            r#"{"gain_unit": 1.5}"#,
            r#"{"frequency_hz": 30000.0}"#,
            r#"{"frequency_hz": 0.0}"#,
            r#"{"q": 0.0}"#,
            r#"{"sample_rate": 0}"#,
            r#"{"max_boost_db": -3.0}"#,
            r#"{"reduction_gain": 2.0}"#,
        ];
        for text in bad {
            let err = BoostConfig::from_json(text).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_ARGUMENT", "{}", text);
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = BoostConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_build_effect() {
        let effect = BoostConfig::default().build_effect().unwrap();
        let filter = effect.as_filter().unwrap();
        assert!(!filter.coefficients().is_neutral());

        let config = BoostConfig {
            effect: EffectKind::GainReduction,
            ..Default::default()
        };
        let effect = config.build_effect().unwrap();
        assert_eq!(effect.effect_type(), "gain-reduction");
        assert_eq!(config.build_registry().kind(), EffectKind::GainReduction);

        let config = BoostConfig::from_json(r#"{"effect": "channel_swap"}"#).unwrap();
        assert_eq!(config.effect, EffectKind::ChannelSwap);
        assert_eq!(config.build_effect().unwrap().display_name(), "Channel Swap");
    }
}
