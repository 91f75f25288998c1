//! PCM sample representations
//!
//! Filtering always happens in the normalized float domain. Each sample type
//! knows how to enter and leave that domain and how to read/write itself as
//! little-endian bytes.

use crate::engine::pcm::SampleEncoding;

/// Positive amplitude ceiling of 16-bit signed PCM
pub const PCM16_CEILING: f32 = i16::MAX as f32;

/// A PCM sample type the filter can process in place
pub trait PcmSample: Copy + Default + Send + 'static {
    /// Encoding this type represents on the wire
    const ENCODING: SampleEncoding;

    /// Convert to a normalized value (nominally in [-1.0, 1.0])
    fn to_normalized(self) -> f32;

    /// Convert a normalized value back, saturating where the type is bounded
    fn from_normalized(value: f32) -> Self;

    /// Multiply by a linear gain, the way the gain-reduction path does it
    fn apply_gain(self, gain: f32) -> Self;

    /// Read one sample from exactly `ENCODING.bytes_per_sample()` bytes
    fn read_le(bytes: &[u8]) -> Self;

    /// Write one sample into exactly `ENCODING.bytes_per_sample()` bytes
    fn write_le(self, out: &mut [u8]);
}

/// Saturate a float to the i16 range
#[inline]
fn saturate_i16(value: f32) -> i16 {
    num_traits::clamp(value, i16::MIN as f32, i16::MAX as f32) as i16
}

impl PcmSample for i16 {
    const ENCODING: SampleEncoding = SampleEncoding::Pcm16;

    #[inline]
    fn to_normalized(self) -> f32 {
        self as f32 / PCM16_CEILING
    }

    #[inline]
    fn from_normalized(value: f32) -> Self {
        saturate_i16((value * PCM16_CEILING).round())
    }

    #[inline]
    fn apply_gain(self, gain: f32) -> Self {
        // truncation toward zero, then saturate
        saturate_i16((self as f32 * gain).trunc())
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        i16::from_le_bytes([bytes[0], bytes[1]])
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }
}

impl PcmSample for f32 {
    const ENCODING: SampleEncoding = SampleEncoding::PcmFloat;

    #[inline]
    fn to_normalized(self) -> f32 {
        self
    }

    #[inline]
    fn from_normalized(value: f32) -> Self {
        value
    }

    #[inline]
    fn apply_gain(self, gain: f32) -> Self {
        (self * gain).clamp(-1.0, 1.0)
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }
}
