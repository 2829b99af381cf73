//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ExtractorConfig;
use crate::engine::{read_mono_wav, AudioBufferer, BufferStatus};
use crate::error::MelError;
use crate::mel::{FilterBounds, MelSpectrogram};

/// Frames extracted from one input
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Configuration the frames were computed with
    pub config: ExtractorConfig,
    /// One mel energy vector per complete block
    pub frames: Vec<Vec<f32>>,
    /// Blocks that could not be published
    pub overruns: usize,
    /// Trailing samples that did not fill a block
    pub dropped_tail: usize,
}

/// Stream `samples` through a bufferer and extract one frame per block
pub fn extract_frames(config: ExtractorConfig, samples: &[f32]) -> crate::Result<Extraction> {
    config.validate()?;
    let mut bufferer = AudioBufferer::new(config.block_length)?;
    let mut extractor = MelSpectrogram::new(config.mel)?;

    let mut frames = Vec::with_capacity(samples.len() / config.block_length);
    let mut overruns = 0;

    for &sample in samples {
        match bufferer.add(sample) {
            BufferStatus::Accumulating => {}
            BufferStatus::BlockReady => {
                if let Some(block) = bufferer.ready_block_mut() {
                    frames.push(extractor.process(block)?.to_vec());
                }
                bufferer.clear_ready();
            }
            BufferStatus::Overrun => overruns += 1,
        }
    }

    Ok(Extraction {
        config,
        frames,
        overruns,
        dropped_tail: bufferer.write_offset(),
    })
}

fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    match path {
        Some(path) => ExtractorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ExtractorConfig::default()),
    }
}

/// Extract mel frames from a WAV file.
pub fn extract(input: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    info!("Extracting mel frames from: {}", input.display());

    let audio = read_mono_wav(input).with_context(|| format!("reading {}", input.display()))?;
    if audio.sample_rate != config.mel.samplerate() {
        return Err(MelError::SampleRateMismatch {
            expected: config.mel.samplerate(),
            actual: audio.sample_rate,
        }
        .into());
    }

    let extraction = extract_frames(config, &audio.samples)?;
    if extraction.overruns > 0 {
        warn!("{} blocks overran", extraction.overruns);
    }
    info!(
        "{} frames, {} trailing samples dropped",
        extraction.frames.len(),
        extraction.dropped_tail
    );

    let json = serde_json::to_string_pretty(&extraction)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Frames written: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Print the filter bank layout.
pub fn filters(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let mel = config.mel;

    println!(
        "{} filters, {}-{} Hz, n_fft {}, {} Hz",
        mel.n_mels(),
        mel.fmin(),
        mel.fmax(),
        mel.n_fft(),
        mel.samplerate()
    );
    println!("{:>5} {:>6} {:>6} {:>6}", "m", "left", "center", "right");
    for (m, FilterBounds { left, center, right }) in mel.filters() {
        println!("{:>5} {:>6} {:>6} {:>6}", m, left, center, right);
    }

    Ok(())
}

/// Write the default configuration.
pub fn init_config(path: &Path) -> Result<()> {
    ExtractorConfig::default()
        .to_file(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Config written: {}", path.display());
    Ok(())
}
