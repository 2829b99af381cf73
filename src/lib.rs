//! Melspec - Mel-Spectrogram Feature Extraction
//!
//! Turns a stream of audio samples into mel-scaled power spectra for a
//! downstream classifier, using fixed buffers and bounded-time operations:
//! 1. Block intake - a double buffer assembles samples into fixed-length
//!    blocks and hands them to the consumer without locks
//! 2. Feature extraction - each block is windowed, transformed, squared and
//!    aggregated through an unnormalized HTK mel filter bank
//!
//! # Example
//!
//! ```no_run
//! use melspec::engine::{AudioBufferer, BufferStatus};
//! use melspec::mel::{MelFilterBankConfig, MelSpectrogram};
//!
//! # fn main() -> melspec::Result<()> {
//! let config = MelFilterBankConfig::new(40, 0.0, 8000.0, 512, 16000)?;
//! let mut extractor = MelSpectrogram::new(config)?;
//! let mut bufferer = AudioBufferer::new(512)?;
//!
//! # let samples = vec![0.0f32; 2048];
//! for sample in samples {
//!     if bufferer.add(sample) == BufferStatus::BlockReady {
//!         if let Some(block) = bufferer.ready_block_mut() {
//!             let mels = extractor.process(block)?;
//!             println!("{:?}", mels);
//!         }
//!         bufferer.clear_ready();
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod mel;

pub use config::ExtractorConfig;
pub use error::{MelError, Result};
