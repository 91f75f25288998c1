//! Audio Engine Module
//!
//! Host-facing plumbing around the DSP core:
//! - PCM buffer views and encodings
//! - Stereo buffer adapter
//! - Filter instance registry and lifecycle
//! - WAV file I/O

pub mod adapter;
pub mod io;
pub mod pcm;
pub mod registry;

pub use io::{export_wav, generate_stereo_tone, import_wav, PcmClip};
pub use pcm::{ByteRange, SampleEncoding};
pub use registry::{FilterHandle, FilterRegistry};
