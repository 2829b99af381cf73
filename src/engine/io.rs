//! WAV input for the extraction front end
//!
//! Reads mono WAV files into 32-bit float samples. There is no resampling
//! and no channel mixing: multi-channel files are rejected and the caller
//! checks the sample rate against its filter bank configuration.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::error::{MelError, Result};

/// Decoded mono audio
#[derive(Debug, Clone)]
pub struct MonoAudio {
    /// Samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl MonoAudio {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a mono WAV file as f32 samples
///
/// # Errors
/// * `AudioIo` - if the file cannot be opened or decoded
/// * `UnsupportedFormat` - if the file has more than one channel or an
///   unsupported integer bit depth
pub fn read_mono_wav(path: &Path) -> Result<MonoAudio> {
    let reader = WavReader::open(path).map_err(|source| MelError::AudioIo {
        path: path.display().to_string(),
        source,
    })?;

    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(MelError::UnsupportedFormat {
            details: format!("{}-channel audio (only mono is supported)", spec.channels),
        });
    }

    let samples = read_samples_as_f32(reader, path)?;

    debug!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        "read mono wav"
    );

    Ok(MonoAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write mono f32 samples as a 32-bit float WAV file
///
/// # Errors
/// * `AudioIo` - if hound fails to create or finalize the file
pub fn write_mono_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let wrap = |source: hound::Error| MelError::AudioIo {
        path: path.display().to_string(),
        source,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wrap)?;
    for &s in samples {
        writer.write_sample(s).map_err(wrap)?;
    }
    writer.finalize().map_err(wrap)?;
    Ok(())
}

/// Generate a mono sine tone
///
/// Useful for testing and benchmarking the extraction pipeline.
pub fn generate_test_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    (0..num_samples)
        .map(|i| (angular_freq * i as f32).sin())
        .collect()
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(mut reader: WavReader<R>, path: &Path) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let wrap = |source: hound::Error| MelError::AudioIo {
        path: path.display().to_string(),
        source,
    };

    match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(wrap),
        SampleFormat::Int => {
            let scale = match spec.bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                // 24-bit stored as i32 in hound
                24 => 8388608.0,
                32 => 2147483648.0,
                bits => {
                    return Err(MelError::UnsupportedFormat {
                        details: format!("{}-bit integer audio", bits),
                    })
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(wrap)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
