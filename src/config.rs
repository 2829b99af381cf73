//! Extractor configuration
//!
//! JSON file layout:
//!
//! ```json
//! {
//!   "block_length": 512,
//!   "mel": { "n_mels": 40, "fmin": 0.0, "fmax": 8000.0, "n_fft": 512, "samplerate": 16000 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MelError, Result};
use crate::mel::MelFilterBankConfig;

/// Block accumulation plus filter bank settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Samples per block handed to the extractor
    pub block_length: usize,
    /// Filter bank
    pub mel: MelFilterBankConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            block_length: 512,
            mel: MelFilterBankConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration and validate it
    pub fn new(block_length: usize, mel: MelFilterBankConfig) -> Result<Self> {
        let config = Self { block_length, mel };
        config.validate()?;
        Ok(config)
    }

    /// Check that blocks can hold a transform frame and the mel output,
    /// and that the filter bank fits the spectrum
    ///
    /// # Errors
    /// * `InvalidConfig` - if `block_length` is shorter than `n_fft` or `n_mels`
    /// * `DomainError` - if a filter falls outside the spectrum
    pub fn validate(&self) -> Result<()> {
        if self.block_length < self.mel.n_fft() {
            return Err(MelError::invalid_config(format!(
                "block_length {} is shorter than n_fft {}",
                self.block_length,
                self.mel.n_fft()
            )));
        }
        if self.block_length < self.mel.n_mels() {
            return Err(MelError::invalid_config(format!(
                "block_length {} cannot hold {} mel bands",
                self.block_length,
                self.mel.n_mels()
            )));
        }
        self.mel.check_bounds()
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded extractor config");
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
