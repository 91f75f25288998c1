//! WAV file I/O for the command-line front end
//!
//! Stereo 16-bit integer and 32-bit float WAV files map directly onto the
//! two supported PCM encodings; their samples are kept as little-endian
//! bytes so they can be fed to the byte-level processing path unchanged.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::pcm::{self, SampleEncoding, STEREO_CHANNELS};
use crate::dsp::sample::PcmSample;
use crate::error::{BoostError, Result};

/// Interleaved stereo PCM loaded from or destined for a WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct PcmClip {
    pub encoding: SampleEncoding,
    pub sample_rate: u32,
    /// Little-endian interleaved samples
    pub bytes: Vec<u8>,
}

impl PcmClip {
    /// Number of stereo frames in the clip
    pub fn num_frames(&self) -> usize {
        self.bytes.len() / self.encoding.bytes_per_frame()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }
}

/// Import a stereo WAV file
///
/// # Errors
/// * `AudioReadError` - If the file cannot be opened or decoded
/// * `UnsupportedFormat` - If the file is not stereo 16-bit int / 32-bit float
pub fn import_wav(path: &Path) -> Result<PcmClip> {
    let read_error = |source: hound::Error| BoostError::AudioReadError {
        path: path.display().to_string(),
        source,
    };

    let reader = WavReader::open(path).map_err(read_error)?;
    let spec = reader.spec();

    if spec.channels as usize != STEREO_CHANNELS {
        return Err(BoostError::UnsupportedFormat {
            details: format!("{}-channel audio (only stereo supported)", spec.channels),
        });
    }

    let (encoding, bytes) = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => {
            let samples = reader
                .into_samples::<i16>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(read_error)?;
            (SampleEncoding::Pcm16, pcm::encode_to_vec(&samples))
        }
        (SampleFormat::Float, 32) => {
            let samples = reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(read_error)?;
            (SampleEncoding::PcmFloat, pcm::encode_to_vec(&samples))
        }
        (format, bits) => {
            return Err(BoostError::UnsupportedFormat {
                details: format!("{}-bit {:?} samples", bits, format),
            });
        }
    };

    log::debug!(
        "Imported {} ({}, {} Hz, {} bytes)",
        path.display(),
        encoding,
        spec.sample_rate,
        bytes.len()
    );

    Ok(PcmClip {
        encoding,
        sample_rate: spec.sample_rate,
        bytes,
    })
}

/// Export a clip as a stereo WAV file in its own encoding
pub fn export_wav(clip: &PcmClip, path: &Path) -> Result<()> {
    let write_error = |source: hound::Error| BoostError::AudioWriteError {
        path: path.display().to_string(),
        source,
    };

    let spec = WavSpec {
        channels: STEREO_CHANNELS as u16,
        sample_rate: clip.sample_rate,
        bits_per_sample: (clip.encoding.bytes_per_sample() * 8) as u16,
        sample_format: match clip.encoding {
            SampleEncoding::Pcm16 => SampleFormat::Int,
            SampleEncoding::PcmFloat => SampleFormat::Float,
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_error)?;
    match clip.encoding {
        SampleEncoding::Pcm16 => {
            for sample in pcm::decode::<i16>(&clip.bytes) {
                writer.write_sample(sample).map_err(write_error)?;
            }
        }
        SampleEncoding::PcmFloat => {
            for sample in pcm::decode::<f32>(&clip.bytes) {
                writer.write_sample(sample).map_err(write_error)?;
            }
        }
    }
    writer.finalize().map_err(write_error)?;
    Ok(())
}

/// Generate a stereo sine clip, handy for smoke tests and demos
pub fn generate_stereo_tone(
    encoding: SampleEncoding,
    frequency_hz: f64,
    amplitude: f32,
    sample_rate: u32,
    num_frames: usize,
) -> PcmClip {
    let tone: Vec<f32> = (0..num_frames)
        .flat_map(|i| {
            let t = i as f64 / sample_rate as f64;
            let s = (2.0 * std::f64::consts::PI * frequency_hz * t).sin() as f32 * amplitude;
            [s, s]
        })
        .collect();

    let bytes = match encoding {
        SampleEncoding::Pcm16 => {
            let samples: Vec<i16> = tone
                .iter()
                .map(|&s| i16::from_normalized(s))
                .collect();
            pcm::encode_to_vec(&samples)
        }
        SampleEncoding::PcmFloat => pcm::encode_to_vec(&tone),
    };

    PcmClip {
        encoding,
        sample_rate,
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pcm16_wav_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone16.wav");
        let clip = generate_stereo_tone(SampleEncoding::Pcm16, 440.0, 0.5, 44100, 441);

        export_wav(&clip, &path).unwrap();
        let loaded = import_wav(&path).unwrap();
        assert_eq!(loaded, clip);
        assert_eq!(loaded.num_frames(), 441);
    }

    #[test]
    fn test_float_wav_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone32.wav");
        let clip = generate_stereo_tone(SampleEncoding::PcmFloat, 100.0, 0.25, 48000, 480);

        export_wav(&clip, &path).unwrap();
        let loaded = import_wav(&path).unwrap();
        assert_eq!(loaded.encoding, SampleEncoding::PcmFloat);
        assert_eq!(loaded.bytes, clip.bytes);
        assert!((loaded.duration() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_mono_wav_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let err = import_wav(&path).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_missing_file() {
        let err = import_wav(Path::new("/nonexistent/file.wav")).unwrap_err();
        assert_eq!(err.error_code(), "AUDIO_READ_ERROR");
    }
}
