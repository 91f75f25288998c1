//! Bassboost - stereo biquad bass boost for PCM audio streams
//!
//! Applies a parametric boost to interleaved stereo PCM (16-bit integer or
//! 32-bit float), one second-order IIR section per channel, with filter
//! history carried across successive host buffers.
//!
//! # Architecture
//!
//! - `dsp`: coefficient design, the biquad state machine, effect strategies
//! - `engine`: PCM buffer views, the stereo adapter, the handle registry
//! - `config`: serializable effect configuration
//!
//! # Example
//! ```
//! use bassboost::dsp::BoostParams;
//! use bassboost::engine::{pcm, FilterRegistry};
//!
//! let mut registry = FilterRegistry::default();
//! let handle = registry.configure(44100, 2, 4).unwrap();
//! registry
//!     .set_params(handle, 44100, BoostParams::new(1.0, 100.0, 0.707))
//!     .unwrap();
//!
//! let input = pcm::encode_to_vec(&[1000i16, 1000, -1000, -1000]);
//! let mut output = vec![0u8; input.len()];
//! registry
//!     .process(handle, &input, &mut output, 0, input.len() as i64, 2)
//!     .unwrap();
//! registry.release(handle).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;

pub use config::BoostConfig;
pub use error::{BoostError, Result};
