//! Stereo buffer adapter
//!
//! Splits interleaved `[L0, R0, L1, R1, ...]` into two contiguous runs
//! `[L0, L1, ...][R0, R1, ...]` of normalized samples, filters each run with
//! its own channel state and interleaves the result back. The planar runs
//! live in a scratch buffer owned by the caller; it grows to the largest
//! buffer seen and is reused afterwards. The byte-level [`process`] entry
//! point validates everything before the output buffer is touched.

use super::pcm::{ByteRange, SampleEncoding, STEREO_CHANNELS};
use crate::dsp::biquad::BiquadSection;
use crate::dsp::effect::Effect;
use crate::dsp::sample::PcmSample;
use crate::error::{BoostError, Result};

/// Normalize interleaved stereo into planar `[left..][right..]` layout
///
/// `planar` must have the same length as `interleaved`.
pub fn deinterleave<T: PcmSample>(interleaved: &[T], planar: &mut [f32]) {
    let (left, right) = planar.split_at_mut(interleaved.len() / STEREO_CHANNELS);
    for ((frame, l), r) in interleaved
        .chunks_exact(STEREO_CHANNELS)
        .zip(left.iter_mut())
        .zip(right.iter_mut())
    {
        *l = frame[0].to_normalized();
        *r = frame[1].to_normalized();
    }
}

/// Write planar `[left..][right..]` back as interleaved stereo
pub fn interleave<T: PcmSample>(planar: &[f32], interleaved: &mut [T]) {
    let (left, right) = planar.split_at(planar.len() / STEREO_CHANNELS);
    for ((frame, l), r) in interleaved
        .chunks_exact_mut(STEREO_CHANNELS)
        .zip(left.iter())
        .zip(right.iter())
    {
        frame[0] = T::from_normalized(*l);
        frame[1] = T::from_normalized(*r);
    }
}

fn check_stereo(sample_count: usize) -> Result<()> {
    if sample_count % STEREO_CHANNELS != 0 {
        return Err(BoostError::invalid(format!(
            "odd sample count {} for interleaved stereo",
            sample_count
        )));
    }
    Ok(())
}

fn filter_planar(planar: &mut [f32], left: &mut BiquadSection, right: &mut BiquadSection) {
    let (left_run, right_run) = planar.split_at_mut(planar.len() / STEREO_CHANNELS);
    left.filter_f32(left_run);
    right.filter_f32(right_run);
}

/// Filter an interleaved stereo run in place, one biquad per channel
pub fn filter_stereo<T: PcmSample>(
    interleaved: &mut [T],
    left: &mut BiquadSection,
    right: &mut BiquadSection,
    scratch: &mut Vec<f32>,
) -> Result<()> {
    check_stereo(interleaved.len())?;

    scratch.clear();
    scratch.resize(interleaved.len(), 0.0);
    deinterleave(interleaved, scratch);
    filter_planar(scratch, left, right);
    interleave(scratch, interleaved);
    Ok(())
}

/// Filter little-endian interleaved stereo from `src` into `dst`
///
/// Samples go straight from bytes into the planar scratch and back, with no
/// intermediate typed buffer. `dst` must be as long as `src`.
pub fn filter_stereo_bytes<T: PcmSample>(
    src: &[u8],
    dst: &mut [u8],
    left: &mut BiquadSection,
    right: &mut BiquadSection,
    scratch: &mut Vec<f32>,
) -> Result<()> {
    let width = T::ENCODING.bytes_per_sample();
    let frame = width * STEREO_CHANNELS;
    check_stereo(src.len() / width)?;
    if src.len() % width != 0 || dst.len() != src.len() {
        return Err(BoostError::invalid(format!(
            "{} input bytes cannot map onto {} output bytes of {}",
            src.len(),
            dst.len(),
            T::ENCODING
        )));
    }

    let frames = src.len() / frame;
    scratch.clear();
    scratch.resize(frames * STEREO_CHANNELS, 0.0);
    {
        let (l, r) = scratch.split_at_mut(frames);
        for ((bytes, l), r) in src.chunks_exact(frame).zip(l.iter_mut()).zip(r.iter_mut()) {
            *l = T::read_le(&bytes[..width]).to_normalized();
            *r = T::read_le(&bytes[width..]).to_normalized();
        }
    }

    filter_planar(scratch, left, right);

    let (l, r) = scratch.split_at(frames);
    for ((bytes, l), r) in dst.chunks_exact_mut(frame).zip(l.iter()).zip(r.iter()) {
        T::from_normalized(*l).write_le(&mut bytes[..width]);
        T::from_normalized(*r).write_le(&mut bytes[width..]);
    }
    Ok(())
}

/// Process `input[position..limit]` into the front of `output`
///
/// # Arguments
/// * `input` - Host input buffer
/// * `output` - Host output buffer, at least `limit - position` bytes
/// * `position` / `limit` - Byte window of `input` to process
/// * `encoding` - Host encoding code (2 = PCM16, 4 = PCM float)
/// * `effect` - Strategy owning the channel state
///
/// # Returns
/// Number of bytes written to `output`. On error nothing has been written.
pub fn process<E: Effect>(
    input: &[u8],
    output: &mut [u8],
    position: i64,
    limit: i64,
    encoding: i32,
    effect: &mut E,
) -> Result<usize> {
    let range = ByteRange::new(position, limit, input.len())?;
    let encoding = SampleEncoding::try_from(encoding)?;
    range.sample_count(encoding)?;
    if output.len() < range.len() {
        return Err(BoostError::invalid(format!(
            "output buffer of {} bytes cannot hold {} bytes",
            output.len(),
            range.len()
        )));
    }

    let src = &input[range.start()..range.end()];
    let dst = &mut output[..range.len()];
    match encoding {
        SampleEncoding::Pcm16 => process_as::<i16, E>(src, dst, effect)?,
        SampleEncoding::PcmFloat => process_as::<f32, E>(src, dst, effect)?,
    }
    Ok(range.len())
}

fn process_as<T: PcmSample, E: Effect>(src: &[u8], dst: &mut [u8], effect: &mut E) -> Result<()> {
    if !effect.is_enabled() {
        dst.copy_from_slice(src);
        return Ok(());
    }
    effect.process_bytes::<T>(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::coefficients::{design_boost, BiquadCoefficients};
    use crate::dsp::effect::FilterInstance;
    use crate::engine::pcm;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deinterleave_layout() {
        let interleaved = [0.1f32, 0.5, 0.2, 0.6, 0.3, 0.7];
        let mut planar = [0.0f32; 6];
        deinterleave(&interleaved, &mut planar);
        assert_eq!(planar, [0.1, 0.2, 0.3, 0.5, 0.6, 0.7]);

        let mut back = [0.0f32; 6];
        interleave(&planar, &mut back);
        assert_eq!(back, interleaved);
    }

    #[test]
    fn test_channels_use_their_own_state() {
        let coeffs = design_boost(1.0, 0.707, 100.0, 44100);
        let mut left = BiquadSection::new(coeffs);
        let mut right = BiquadSection::new(coeffs);
        let mut scratch = Vec::new();

        let mut samples = [0.5f32, 0.0, -0.25, 0.0, 0.75, 0.0];
        filter_stereo(&mut samples, &mut left, &mut right, &mut scratch).unwrap();

        assert!(!left.history().is_zero());
        assert!(right.history().is_zero());
        assert_eq!([samples[1], samples[3], samples[5]], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_filter_stereo_rejects_odd_length() {
        let mut left = BiquadSection::new(BiquadCoefficients::neutral());
        let mut right = BiquadSection::new(BiquadCoefficients::neutral());
        let mut samples = [1i16, 2, 3];
        assert!(filter_stereo(&mut samples, &mut left, &mut right, &mut Vec::new()).is_err());
        assert_eq!(samples, [1, 2, 3]);
    }

    #[test]
    fn test_byte_path_matches_typed_path() {
        let coeffs = design_boost(1.0, 0.707, 100.0, 44100);
        let samples = [1000i16, -2000, 3000, 0, -4000, 500, 32767, -32768];

        let mut typed = samples;
        let (mut l1, mut r1) = (BiquadSection::new(coeffs), BiquadSection::new(coeffs));
        filter_stereo(&mut typed, &mut l1, &mut r1, &mut Vec::new()).unwrap();

        let src = pcm::encode_to_vec(&samples);
        let mut dst = vec![0u8; src.len()];
        let (mut l2, mut r2) = (BiquadSection::new(coeffs), BiquadSection::new(coeffs));
        filter_stereo_bytes::<i16>(&src, &mut dst, &mut l2, &mut r2, &mut Vec::new()).unwrap();

        assert_eq!(pcm::decode::<i16>(&dst), typed.to_vec());
        assert_eq!(l1.history(), l2.history());
        assert_eq!(r1.history(), r2.history());
    }

    #[test]
    fn test_scratch_is_reused() {
        let mut left = BiquadSection::new(BiquadCoefficients::neutral());
        let mut right = BiquadSection::new(BiquadCoefficients::neutral());
        let mut scratch = Vec::with_capacity(64);
        let ptr = scratch.as_ptr();

        let src = pcm::encode_to_vec(&[0.25f32; 32]);
        let mut dst = vec![0u8; src.len()];
        for _ in 0..3 {
            filter_stereo_bytes::<f32>(&src, &mut dst, &mut left, &mut right, &mut scratch)
                .unwrap();
        }
        assert_eq!(scratch.as_ptr(), ptr);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_process_window_and_bytes_written() {
        let samples = [7i16, 8, 100, -100, 200, -200, 9, 9];
        let input = pcm::encode_to_vec(&samples);
        let mut output = vec![0xAAu8; 16];
        let mut filter = FilterInstance::new(44100);

        // frames 1 and 2 only
        let written = process(&input, &mut output, 4, 12, 2, &mut filter).unwrap();
        assert_eq!(written, 8);
        assert_eq!(pcm::decode::<i16>(&output[..8]), vec![100, -100, 200, -200]);
        assert!(output[8..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_disabled_effect_copies_input() {
        let samples = [0.5f32, -0.5, 0.25, -0.25];
        let input = pcm::encode_to_vec(&samples);
        let mut output = vec![0u8; input.len()];
        let mut filter = FilterInstance::new(44100);
        filter
            .set_coefficients(design_boost(1.0, 0.707, 100.0, 44100))
            .unwrap();
        filter.set_enabled(false);

        process(&input, &mut output, 0, input.len() as i64, 4, &mut filter).unwrap();
        assert_eq!(output, input);
        assert!(filter.left().history().is_zero());
    }

    #[test]
    fn test_undersized_output_rejected() {
        let input = pcm::encode_to_vec(&[1i16, 2, 3, 4]);
        let mut output = vec![0x55u8; 6];
        let mut filter = FilterInstance::new(44100);
        let err = process(&input, &mut output, 0, 8, 2, &mut filter).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert_eq!(output, vec![0x55u8; 6]);
    }
}
