//! Mel spectrogram feature extraction
//!
//! HTK mel scale, unnormalized triangular filter bank, power spectrum and
//! the block pipeline tying them together.

mod aggregate;
mod filter_bank;
mod pipeline;
mod power;
mod scale;

pub use aggregate::mel_aggregate;
pub use filter_bank::{FilterBounds, Filters, MelFilterBankConfig};
pub use pipeline::{melspectrogram, MelSpectrogram};
pub use power::{power_spectrum, power_spectrum_in_place};
pub use scale::{hz_to_mel, mel_to_hz};
