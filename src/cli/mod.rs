//! CLI Module
//!
//! Command-line interface for offline mel feature extraction.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Melspec - mel-spectrogram feature extraction
#[derive(Parser, Debug)]
#[command(name = "melspec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract mel frames from a mono WAV file
    #[command(name = "extract")]
    Extract {
        /// Input WAV file
        input: PathBuf,

        /// Extractor configuration (JSON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file for the JSON frames (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the bin boundaries of every filter
    #[command(name = "filters")]
    Filters {
        /// Extractor configuration (JSON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the default configuration to a file
    #[command(name = "init-config")]
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}
