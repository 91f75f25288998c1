//! PCM buffer views
//!
//! Byte-level contract with the host: encoding constants, `[position, limit)`
//! range checks and little-endian sample (de)serialization. Nothing here
//! writes to a caller buffer until every check has passed.

use crate::dsp::sample::PcmSample;
use crate::error::{BoostError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channels carried by every buffer
pub const STEREO_CHANNELS: usize = 2;

// ============================================================================
// Sample Encoding
// ============================================================================

/// Supported PCM encodings, numbered like common platform audio enums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum SampleEncoding {
    /// 16-bit signed integer PCM
    Pcm16 = 2,
    /// 32-bit IEEE float PCM
    PcmFloat = 4,
}

impl SampleEncoding {
    /// Bytes per single-channel sample
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            SampleEncoding::Pcm16 => 2,
            SampleEncoding::PcmFloat => 4,
        }
    }

    /// Bytes per interleaved stereo frame
    pub const fn bytes_per_frame(self) -> usize {
        self.bytes_per_sample() * STEREO_CHANNELS
    }

    /// Encoding whose stereo frame is `bytes_per_frame` wide
    pub fn from_bytes_per_frame(bytes_per_frame: usize) -> Option<Self> {
        [SampleEncoding::Pcm16, SampleEncoding::PcmFloat]
            .into_iter()
            .find(|e| e.bytes_per_frame() == bytes_per_frame)
    }

    /// Numeric value used on the host boundary
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for SampleEncoding {
    type Error = BoostError;

    fn try_from(encoding: i32) -> Result<Self> {
        match encoding {
            2 => Ok(SampleEncoding::Pcm16),
            4 => Ok(SampleEncoding::PcmFloat),
            _ => Err(BoostError::UnsupportedEncoding { encoding }),
        }
    }
}

impl fmt::Display for SampleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleEncoding::Pcm16 => write!(f, "PCM16"),
            SampleEncoding::PcmFloat => write!(f, "PCM float"),
        }
    }
}

// ============================================================================
// Byte Range
// ============================================================================

/// A validated `[position, limit)` window into a host buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start: usize,
    end: usize,
}

impl ByteRange {
    /// Validate a host-supplied range against the input length
    pub fn new(position: i64, limit: i64, input_len: usize) -> Result<Self> {
        if position < 0 {
            return Err(BoostError::invalid(format!(
                "position {} is negative",
                position
            )));
        }
        if position > limit {
            return Err(BoostError::invalid(format!(
                "position {} is past limit {}",
                position, limit
            )));
        }
        let (start, end) = (position as u64, limit as u64);
        if end > input_len as u64 {
            return Err(BoostError::invalid(format!(
                "limit {} exceeds input buffer of {} bytes",
                limit, input_len
            )));
        }
        Ok(Self {
            start: start as usize,
            end: end as usize,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of single-channel samples, which must form whole stereo pairs
    pub fn sample_count(&self, encoding: SampleEncoding) -> Result<usize> {
        let width = encoding.bytes_per_sample();
        if self.len() % width != 0 {
            return Err(BoostError::invalid(format!(
                "{} bytes is not a whole number of {} samples",
                self.len(),
                encoding
            )));
        }
        let samples = self.len() / width;
        if samples % STEREO_CHANNELS != 0 {
            return Err(BoostError::invalid(format!(
                "odd sample count {} for interleaved stereo",
                samples
            )));
        }
        Ok(samples)
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Decode little-endian bytes into samples
pub fn decode<T: PcmSample>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(T::ENCODING.bytes_per_sample())
        .map(T::read_le)
        .collect()
}

/// Encode samples as little-endian bytes into `out`
///
/// `out` must be exactly `samples.len() * bytes_per_sample` long.
pub fn encode<T: PcmSample>(samples: &[T], out: &mut [u8]) {
    for (sample, chunk) in samples
        .iter()
        .zip(out.chunks_exact_mut(T::ENCODING.bytes_per_sample()))
    {
        sample.write_le(chunk);
    }
}

/// Encode samples into a freshly allocated byte vector
pub fn encode_to_vec<T: PcmSample>(samples: &[T]) -> Vec<u8> {
    let mut out = vec![0u8; samples.len() * T::ENCODING.bytes_per_sample()];
    encode(samples, &mut out);
    out
}
