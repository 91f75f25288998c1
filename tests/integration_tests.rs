//! Integration Tests
//!
//! End-to-end tests of the host-facing lifecycle: configure, set_params,
//! process, reset, release.

use bassboost::dsp::{BiquadCoefficients, BoostParams, Effect, FilterInstance};
use bassboost::engine::pcm::{self, SampleEncoding};
use bassboost::engine::{FilterHandle, FilterRegistry};
use bassboost::BoostError;
use pretty_assertions::assert_eq;

const PCM16: i32 = SampleEncoding::Pcm16 as i32;
const PCM_FLOAT: i32 = SampleEncoding::PcmFloat as i32;
const SENTINEL: u8 = 0xAB;

/// Registry with one configured full-boost instance at 44.1 kHz
fn boosted(bytes_per_frame: usize) -> (FilterRegistry, FilterHandle) {
    let mut registry = FilterRegistry::default();
    let handle = registry.configure(44100, 2, bytes_per_frame).unwrap();
    registry
        .set_params(handle, 44100, BoostParams::new(1.0, 100.0, 0.707))
        .unwrap();
    (registry, handle)
}

fn run_pcm16(registry: &mut FilterRegistry, handle: FilterHandle, samples: &[i16]) -> Vec<i16> {
    let input = pcm::encode_to_vec(samples);
    let mut output = vec![0u8; input.len()];
    let written = registry
        .process(handle, &input, &mut output, 0, input.len() as i64, PCM16)
        .unwrap();
    assert_eq!(written, input.len());
    pcm::decode(&output)
}

fn run_float(registry: &mut FilterRegistry, handle: FilterHandle, samples: &[f32]) -> Vec<f32> {
    let input = pcm::encode_to_vec(samples);
    let mut output = vec![0u8; input.len()];
    registry
        .process(handle, &input, &mut output, 0, input.len() as i64, PCM_FLOAT)
        .unwrap();
    pcm::decode(&output)
}

/// Deterministic pseudo-random stereo test signal
fn noise_pcm16(frames: usize, seed: u32) -> Vec<i16> {
    let mut state = seed;
    (0..frames * 2)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((state >> 16) as i16) / 4
        })
        .collect()
}

// === Boost Scenario ===

#[test]
fn test_first_sample_is_boosted_symmetrically() {
    let (mut registry, handle) = boosted(4);
    let out = run_pcm16(&mut registry, handle, &[1000, 1000, -1000, -1000]);

    assert!(out[0].abs() > 1000, "boost not engaged: {}", out[0]);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[2], out[3]);
}

#[test]
fn test_float_path_matches_recurrence() {
    let (mut registry, handle) = boosted(8);
    let coeffs = *registry.get(handle).unwrap().as_filter().unwrap().coefficients();

    let out = run_float(&mut registry, handle, &[0.5, 0.25, -0.5, 0.0]);
    let l0 = coeffs.b0 * 0.5;
    let l1 = coeffs.b0 * -0.5 + coeffs.b1 * 0.5 + coeffs.a1 * l0;
    let r0 = coeffs.b0 * 0.25;
    let r1 = coeffs.b1 * 0.25 + coeffs.a1 * r0;
    assert_eq!(out, vec![l0, r0, l1, r1]);
}

// === Determinism ===

#[test]
fn test_processing_is_deterministic() {
    let input = noise_pcm16(512, 7);
    let (mut a, ha) = boosted(4);
    let (mut b, hb) = boosted(4);
    assert_eq!(run_pcm16(&mut a, ha, &input), run_pcm16(&mut b, hb, &input));
}

// === Channel Independence ===

#[test]
fn test_silent_channel_stays_silent() {
    let mut input = noise_pcm16(256, 3);
    for frame in input.chunks_exact_mut(2) {
        frame[1] = 0;
    }

    let (mut registry, handle) = boosted(4);
    let out = run_pcm16(&mut registry, handle, &input);
    assert!(out.chunks_exact(2).all(|frame| frame[1] == 0));

    let filter = registry.get(handle).unwrap().as_filter().unwrap();
    assert!(filter.right().history().is_zero());
    assert!(!filter.left().history().is_zero());
}

#[test]
fn test_channel_output_ignores_other_channel() {
    let left_only: Vec<i16> = noise_pcm16(128, 11)
        .chunks_exact(2)
        .flat_map(|frame| [frame[0], 0])
        .collect();
    let with_right: Vec<i16> = noise_pcm16(128, 11)
        .chunks_exact(2)
        .zip(noise_pcm16(128, 99).chunks_exact(2))
        .flat_map(|(a, b)| [a[0], b[1]])
        .collect();

    let (mut r1, h1) = boosted(4);
    let (mut r2, h2) = boosted(4);
    let out1 = run_pcm16(&mut r1, h1, &left_only);
    let out2 = run_pcm16(&mut r2, h2, &with_right);

    let left1: Vec<i16> = out1.iter().step_by(2).copied().collect();
    let left2: Vec<i16> = out2.iter().step_by(2).copied().collect();
    assert_eq!(left1, left2);
}

#[test]
fn test_silent_left_channel_stays_silent() {
    let mut input = noise_pcm16(256, 21);
    for frame in input.chunks_exact_mut(2) {
        frame[0] = 0;
    }

    let (mut registry, handle) = boosted(4);
    let out = run_pcm16(&mut registry, handle, &input);
    assert!(out.chunks_exact(2).all(|frame| frame[0] == 0));

    let filter = registry.get(handle).unwrap().as_filter().unwrap();
    assert!(filter.left().history().is_zero());
    assert!(!filter.right().history().is_zero());
}

#[test]
fn test_right_output_ignores_left_channel() {
    let right_only: Vec<i16> = noise_pcm16(128, 13)
        .chunks_exact(2)
        .flat_map(|frame| [0, frame[1]])
        .collect();
    let with_left: Vec<i16> = noise_pcm16(128, 77)
        .chunks_exact(2)
        .zip(noise_pcm16(128, 13).chunks_exact(2))
        .flat_map(|(a, b)| [a[0], b[1]])
        .collect();

    let (mut r1, h1) = boosted(8);
    let (mut r2, h2) = boosted(8);
    let to_float = |samples: &[i16]| -> Vec<f32> {
        samples.iter().map(|&s| s as f32 / 32768.0).collect()
    };
    let out1 = run_float(&mut r1, h1, &to_float(&right_only));
    let out2 = run_float(&mut r2, h2, &to_float(&with_left));

    let right1: Vec<f32> = out1.iter().skip(1).step_by(2).copied().collect();
    let right2: Vec<f32> = out2.iter().skip(1).step_by(2).copied().collect();
    assert_eq!(right1, right2);
}

// === Identity Filter ===

#[test]
fn test_neutral_instance_reproduces_pcm16() {
    let mut registry = FilterRegistry::default();
    let handle = registry.configure(48000, 2, 4).unwrap();
    let input = noise_pcm16(300, 5);
    let out = run_pcm16(&mut registry, handle, &input);
    for (a, b) in input.iter().zip(out.iter()) {
        assert!((*a as i32 - *b as i32).abs() <= 1, "{} vs {}", a, b);
    }
}

#[test]
fn test_neutral_instance_reproduces_float() {
    let mut registry = FilterRegistry::default();
    let handle = registry.configure(48000, 2, 8).unwrap();
    let input: Vec<f32> = (0..200).map(|i| ((i as f32) * 0.37).sin() * 0.9).collect();
    assert_eq!(run_float(&mut registry, handle, &input), input);
}

// === Saturation ===

#[test]
fn test_pcm16_output_saturates() {
    let mut registry = FilterRegistry::default();
    let handle = registry.configure(44100, 2, 4).unwrap();
    let loud = BiquadCoefficients {
        b0: 4.0,
        ..BiquadCoefficients::neutral()
    };
    registry.set_coefficients(handle, loud).unwrap();

    let out = run_pcm16(&mut registry, handle, &[20000, -20000, 32767, -32768]);
    assert_eq!(out, vec![i16::MAX, i16::MIN, i16::MAX, i16::MIN]);
}

// === History ===

#[test]
fn test_history_persists_across_buffers() {
    let first = noise_pcm16(64, 1);
    let second = noise_pcm16(64, 2);

    let (mut continuous, hc) = boosted(4);
    run_pcm16(&mut continuous, hc, &first);
    let carried = run_pcm16(&mut continuous, hc, &second);

    let (mut fresh, hf) = boosted(4);
    let isolated = run_pcm16(&mut fresh, hf, &second);

    assert_ne!(&carried[..4], &isolated[..4]);
}

#[test]
fn test_split_buffers_match_single_buffer() {
    let input = noise_pcm16(200, 42);
    let (mut whole, hw) = boosted(4);
    let expected = run_pcm16(&mut whole, hw, &input);

    let (mut split, hs) = boosted(4);
    let mut actual = run_pcm16(&mut split, hs, &input[..122]);
    actual.extend(run_pcm16(&mut split, hs, &input[122..]));
    assert_eq!(actual, expected);
}

#[test]
fn test_param_update_keeps_history_and_reset_clears_it() {
    let first = noise_pcm16(64, 8);
    let second = noise_pcm16(64, 9);
    let update = BoostParams::new(0.5, 150.0, 1.0);

    let (mut registry, handle) = boosted(4);
    run_pcm16(&mut registry, handle, &first);
    let before = *registry
        .get(handle)
        .unwrap()
        .as_filter()
        .unwrap()
        .left()
        .history();
    registry.set_params(handle, 44100, update).unwrap();
    let after = *registry
        .get(handle)
        .unwrap()
        .as_filter()
        .unwrap()
        .left()
        .history();
    assert_eq!(before, after);
    let carried = run_pcm16(&mut registry, handle, &second);

    let mut reference = FilterInstance::with_params(44100, update).unwrap();
    let mut isolated = second.clone();
    reference.process(&mut isolated).unwrap();
    assert_ne!(&carried[..4], &isolated[..4]);

    // after reset the instance behaves like a fresh one
    registry.reset(handle).unwrap();
    let restarted = run_pcm16(&mut registry, handle, &second);
    assert_eq!(restarted, isolated);
}

// === Invalid Arguments ===

fn assert_rejected(position: i64, limit: i64, encoding: i32, code: &str) {
    let (mut registry, handle) = boosted(4);
    let input = pcm::encode_to_vec(&noise_pcm16(16, 4));
    let mut output = vec![SENTINEL; input.len()];

    let err = registry
        .process(handle, &input, &mut output, position, limit, encoding)
        .unwrap_err();
    assert_eq!(err.error_code(), code);
    assert!(err.is_recoverable());
    assert!(output.iter().all(|&b| b == SENTINEL));

    let filter = registry.get(handle).unwrap().as_filter().unwrap();
    assert!(filter.left().history().is_zero());
    assert!(filter.right().history().is_zero());
}

#[test]
fn test_position_past_limit_rejected() {
    assert_rejected(32, 16, PCM16, "INVALID_ARGUMENT");
}

#[test]
fn test_negative_position_rejected() {
    assert_rejected(-4, 16, PCM16, "INVALID_ARGUMENT");
}

#[test]
fn test_limit_past_input_rejected() {
    assert_rejected(0, 1024, PCM16, "INVALID_ARGUMENT");
}

#[test]
fn test_odd_sample_count_rejected() {
    assert_rejected(0, 6, PCM16, "INVALID_ARGUMENT");
}

#[test]
fn test_unsupported_encoding_rejected() {
    assert_rejected(0, 16, 3, "UNSUPPORTED_ENCODING");
    assert_rejected(0, 16, 0, "UNSUPPORTED_ENCODING");
}

// === Lifecycle ===

#[test]
fn test_unstable_params_halt_the_instance() {
    let (mut registry, handle) = boosted(4);
    let err = registry
        .set_params(handle, 44100, BoostParams::new(1.0, 100.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, BoostError::NumericInstability { .. }));

    let input = pcm::encode_to_vec(&[100i16, 100]);
    let mut output = vec![SENTINEL; 4];
    let err = registry
        .process(handle, &input, &mut output, 0, 4, PCM16)
        .unwrap_err();
    assert!(!err.is_recoverable());
    assert!(output.iter().all(|&b| b == SENTINEL));
}

#[test]
fn test_independent_instances() {
    let mut registry = FilterRegistry::default();
    let a = registry.configure(44100, 2, 4).unwrap();
    let b = registry.configure(44100, 2, 4).unwrap();
    registry
        .set_params(a, 44100, BoostParams::new(1.0, 100.0, 0.707))
        .unwrap();

    let input = noise_pcm16(32, 6);
    let boosted_out = run_pcm16(&mut registry, a, &input);
    let neutral_out = run_pcm16(&mut registry, b, &input);
    assert_ne!(boosted_out, neutral_out);
    assert_eq!(neutral_out, input);

    registry.release(a).unwrap();
    assert!(matches!(
        registry.reset(a),
        Err(BoostError::UseAfterRelease { .. })
    ));
    registry.reset(b).unwrap();
}
