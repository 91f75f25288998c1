//! DSP core
//!
//! Coefficient design, the per-channel biquad state machine and the effect
//! strategies built on top of them.

pub mod biquad;
pub mod coefficients;
pub mod effect;
pub mod sample;

pub use biquad::{BiquadHistory, BiquadSection};
pub use coefficients::{
    design_boost, BiquadCoefficients, BoostParams, BoostPreset, FilterShape, DEFAULT_MAX_BOOST_DB,
};
pub use effect::{AudioEffect, ChannelSwap, Effect, EffectKind, FilterInstance, GainReduction};
pub use sample::PcmSample;
