//! CLI Module
//!
//! Command-line interface for the bass-boost processor.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::BoostConfig;
use crate::dsp::coefficients::{BoostPreset, FilterShape};
use crate::dsp::effect::EffectKind;

/// Bassboost - stereo biquad bass boost for PCM audio
#[derive(Parser, Debug)]
#[command(name = "bassboost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Filter parameters shared by several commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Boost knob from 0 to 1
    #[arg(short, long)]
    pub gain: Option<f32>,

    /// Center frequency in Hz
    #[arg(short, long)]
    pub frequency: Option<f32>,

    /// Bandwidth (Q)
    #[arg(short, long)]
    pub q: Option<f32>,

    /// Boost in dB when the knob is fully open
    #[arg(long)]
    pub max_boost_db: Option<f32>,

    /// Filter shape
    #[arg(long, value_enum)]
    pub shape: Option<ShapeArg>,

    /// Sample rate used for design (process takes it from the file)
    #[arg(long)]
    pub sample_rate: Option<u32>,
}

impl FilterArgs {
    /// Resolve the effective configuration: file, then flag overrides
    pub fn resolve(&self) -> crate::Result<BoostConfig> {
        let mut config = match &self.config {
            Some(path) => BoostConfig::from_file(path)?,
            None => BoostConfig::default(),
        };
        if let Some(gain) = self.gain {
            config.gain_unit = gain;
        }
        if let Some(frequency) = self.frequency {
            config.frequency_hz = frequency;
        }
        if let Some(q) = self.q {
            config.q = q;
        }
        if let Some(max_boost_db) = self.max_boost_db {
            config.max_boost_db = max_boost_db;
        }
        if let Some(shape) = self.shape {
            config.shape = shape.into();
        }
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ShapeArg {
    Peaking,
    LowShelf,
    HighShelf,
}

impl From<ShapeArg> for FilterShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Peaking => FilterShape::Peaking,
            ShapeArg::LowShelf => FilterShape::LowShelf,
            ShapeArg::HighShelf => FilterShape::HighShelf,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PresetArg {
    #[value(name = "6db")]
    Boost6Db,
    #[value(name = "9db")]
    Boost9Db,
    #[value(name = "12db")]
    Boost12Db,
}

impl From<PresetArg> for BoostPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Boost6Db => BoostPreset::Boost6Db,
            PresetArg::Boost9Db => BoostPreset::Boost9Db,
            PresetArg::Boost12Db => BoostPreset::Boost12Db,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a stereo WAV file through the effect
    #[command(name = "process")]
    Process {
        /// Input WAV (stereo, 16-bit int or 32-bit float)
        input: PathBuf,

        /// Output WAV, written in the input's encoding
        output: PathBuf,

        /// Effect strategy (bass-boost, gain-reduction or channel-swap)
        #[arg(short, long)]
        effect: Option<EffectKind>,

        /// Use a fixed boost curve instead of designed coefficients
        #[arg(short, long, value_enum)]
        preset: Option<PresetArg>,

        /// Frames per processing block
        #[arg(short, long, default_value_t = 1024)]
        block_frames: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print designed coefficients as JSON
    #[command(name = "coefficients")]
    Coefficients {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the magnitude response at the given frequencies
    #[command(name = "response")]
    Response {
        /// Frequencies in Hz
        #[arg(required = true)]
        frequencies: Vec<f64>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}
