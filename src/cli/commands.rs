//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::config::BoostConfig;
use crate::dsp::coefficients::{BiquadCoefficients, BoostPreset};
use crate::engine::io::{export_wav, import_wav, PcmClip};
use crate::engine::pcm::STEREO_CHANNELS;
use crate::error::{BoostError, Result};

/// Process a WAV file block by block through a registry-owned instance.
///
/// Returns the number of stereo frames processed.
pub fn process_file(
    input: &Path,
    output: &Path,
    config: &BoostConfig,
    preset: Option<BoostPreset>,
    block_frames: usize,
) -> Result<usize> {
    if block_frames == 0 {
        return Err(BoostError::invalid("block size must be at least one frame"));
    }

    info!("Processing {} -> {}", input.display(), output.display());
    let clip = import_wav(input)?;

    let config = BoostConfig {
        sample_rate: clip.sample_rate,
        ..config.clone()
    };
    config.validate()?;

    let mut registry = config.build_registry();
    let frame_bytes = clip.encoding.bytes_per_frame();
    let handle = registry.configure(clip.sample_rate, STEREO_CHANNELS as u16, frame_bytes)?;
    match preset {
        Some(preset) => registry.set_coefficients(handle, preset.coefficients())?,
        None => registry.set_params(handle, clip.sample_rate, config.boost_params())?,
    }

    let mut processed = vec![0u8; clip.bytes.len()];
    let block_bytes = block_frames * frame_bytes;
    for position in (0..clip.bytes.len()).step_by(block_bytes) {
        let limit = (position + block_bytes).min(clip.bytes.len());
        registry.process(
            handle,
            &clip.bytes,
            &mut processed[position..limit],
            position as i64,
            limit as i64,
            clip.encoding.code(),
        )?;
    }
    registry.release(handle)?;

    let result = PcmClip {
        bytes: processed,
        ..clip
    };
    export_wav(&result, output)?;

    info!(
        "Wrote {} frames ({:.2}s, {}) with {:?}",
        result.num_frames(),
        result.duration(),
        result.encoding,
        config.effect
    );
    Ok(result.num_frames())
}

/// Design coefficients for a configuration.
pub fn design(config: &BoostConfig) -> Result<BiquadCoefficients> {
    let coeffs = config.boost_params().design(config.sample_rate);
    coeffs.validate()?;
    Ok(coeffs)
}

/// Print designed coefficients as JSON.
pub fn print_coefficients(config: &BoostConfig) -> Result<()> {
    let coeffs = design(config)?;
    println!("{}", serde_json::to_string_pretty(&coeffs)?);
    Ok(())
}

/// Print the magnitude response at each frequency.
pub fn print_response(config: &BoostConfig, frequencies: &[f64]) -> Result<()> {
    let coeffs = design(config)?;
    for &frequency in frequencies {
        println!(
            "{:>10.1} Hz  {:>+7.2} dB",
            frequency,
            coeffs.magnitude_db(frequency, config.sample_rate as f64)
        );
    }
    Ok(())
}
