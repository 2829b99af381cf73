//! Triangular mel filter bank geometry
//!
//! Filters are spaced evenly in mel space between `fmin` and `fmax`. The
//! `n_mels + 2` edge points are mapped to FFT bins with
//! `floor((n_fft + 1) * hz / samplerate)`; filter `m` (1-based) spans
//! `bin(m - 1)..bin(m + 1)` and peaks at `bin(m)`.
//!
//! The bank is deliberately unnormalized: filter areas are not unit-area.

use serde::{Deserialize, Serialize};

use super::scale::{hz_to_mel, mel_to_hz};
use crate::error::{MelError, Result};

/// Filter bank configuration
///
/// Immutable once constructed and passed by value. Deserialization goes
/// through [`MelFilterBankConfig::new`], so every instance has passed
/// structural validation. Whether the filters fit inside the spectrum is
/// checked separately by [`MelFilterBankConfig::check_bounds`] and by the
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MelFilterBankParams")]
pub struct MelFilterBankConfig {
    n_mels: usize,
    fmin: f32,
    fmax: f32,
    n_fft: usize,
    samplerate: u32,
}

/// Unvalidated wire form of [`MelFilterBankConfig`]
#[derive(Debug, Clone, Copy, Deserialize)]
struct MelFilterBankParams {
    n_mels: usize,
    fmin: f32,
    fmax: f32,
    n_fft: usize,
    samplerate: u32,
}

impl TryFrom<MelFilterBankParams> for MelFilterBankConfig {
    type Error = MelError;

    fn try_from(p: MelFilterBankParams) -> Result<Self> {
        MelFilterBankConfig::new(p.n_mels, p.fmin, p.fmax, p.n_fft, p.samplerate)
    }
}

impl Default for MelFilterBankConfig {
    /// 40 bands over 0-8000 Hz for 512-point transforms of 16 kHz audio
    fn default() -> Self {
        Self {
            n_mels: 40,
            fmin: 0.0,
            fmax: 8000.0,
            n_fft: 512,
            samplerate: 16000,
        }
    }
}

impl MelFilterBankConfig {
    /// Create a validated filter bank configuration
    ///
    /// # Errors
    /// * `InvalidConfig` - if `n_mels` is zero, `n_fft` is zero or odd,
    ///   `samplerate` is zero, or the frequency range is not `0 <= fmin < fmax`
    pub fn new(n_mels: usize, fmin: f32, fmax: f32, n_fft: usize, samplerate: u32) -> Result<Self> {
        if n_mels == 0 {
            return Err(MelError::invalid_config("n_mels must be at least 1"));
        }
        if n_fft < 2 || n_fft % 2 != 0 {
            return Err(MelError::invalid_config(format!(
                "n_fft must be a positive even number, got {}",
                n_fft
            )));
        }
        if samplerate == 0 {
            return Err(MelError::invalid_config("samplerate must be positive"));
        }
        if !fmin.is_finite() || !fmax.is_finite() {
            return Err(MelError::invalid_config("fmin and fmax must be finite"));
        }
        if fmin < 0.0 || fmin >= fmax {
            return Err(MelError::invalid_config(format!(
                "frequency range must satisfy 0 <= fmin < fmax, got {}..{}",
                fmin, fmax
            )));
        }

        Ok(Self {
            n_mels,
            fmin,
            fmax,
            n_fft,
            samplerate,
        })
    }

    /// Number of mel bands
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Lower edge of the lowest filter in Hz
    pub fn fmin(&self) -> f32 {
        self.fmin
    }

    /// Upper edge of the highest filter in Hz
    pub fn fmax(&self) -> f32 {
        self.fmax
    }

    /// Transform size
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Sample rate in Hz
    pub fn samplerate(&self) -> u32 {
        self.samplerate
    }

    /// Number of non-redundant spectrum bins, `1 + n_fft / 2`
    pub fn spectrum_length(&self) -> usize {
        1 + self.n_fft / 2
    }

    /// FFT bin of mel edge point `n` (0-based, `0..=n_mels + 1`)
    pub fn mel_bin(&self, n: usize) -> i64 {
        let melmin = hz_to_mel(self.fmin);
        let melmax = hz_to_mel(self.fmax);
        let melstep = (melmax - melmin) / (self.n_mels + 1) as f32;

        let mel = melmin + n as f32 * melstep;
        let hz = mel_to_hz(mel);
        ((self.n_fft + 1) as f32 * (hz / self.samplerate as f32)).floor() as i64
    }

    /// Bin boundaries of filter `m` (1-based, `1..=n_mels`)
    pub fn filter_bounds(&self, m: usize) -> FilterBounds {
        debug_assert!((1..=self.n_mels).contains(&m), "filter index {} out of range", m);
        FilterBounds {
            left: self.mel_bin(m - 1),
            center: self.mel_bin(m),
            right: self.mel_bin(m + 1),
        }
    }

    /// Iterate over all filters as `(m, bounds)` with `m` 1-based
    pub fn filters(&self) -> Filters {
        Filters {
            config: *self,
            m: 1,
            left: self.mel_bin(0),
            center: self.mel_bin(1),
        }
    }

    /// Check that every filter lies inside `0..=spectrum_length()`
    ///
    /// # Errors
    /// * `DomainError` - for the first filter whose left edge is negative or
    ///   whose right edge exceeds the spectrum length
    pub fn check_bounds(&self) -> Result<()> {
        let max_bin = self.spectrum_length();
        for (m, bounds) in self.filters() {
            bounds.check(m, max_bin)?;
        }
        Ok(())
    }
}

/// Left, center and right bin of one triangular filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterBounds {
    pub left: i64,
    pub center: i64,
    pub right: i64,
}

impl FilterBounds {
    /// Reject filters reaching outside `0..=max_bin`
    pub fn check(&self, filter: usize, max_bin: usize) -> Result<()> {
        if self.left < 0 || self.right > max_bin as i64 {
            return Err(MelError::DomainError {
                filter,
                left: self.left,
                right: self.right,
                max_bin,
            });
        }
        Ok(())
    }

    /// Triangular weight of bin `k`
    ///
    /// Rising edge over `left..center`, falling edge over `center..right`,
    /// zero elsewhere. A zero-width edge has an empty range and contributes
    /// nothing.
    pub fn weight(&self, k: i64) -> f32 {
        if k >= self.left && k < self.center {
            (k - self.left) as f32 / (self.center - self.left) as f32
        } else if k >= self.center && k < self.right {
            (self.right - k) as f32 / (self.right - self.center) as f32
        } else {
            0.0
        }
    }
}

/// Iterator over the filters of a bank, reusing each edge bin once
#[derive(Debug, Clone)]
pub struct Filters {
    config: MelFilterBankConfig,
    m: usize,
    left: i64,
    center: i64,
}

impl Iterator for Filters {
    type Item = (usize, FilterBounds);

    fn next(&mut self) -> Option<Self::Item> {
        if self.m > self.config.n_mels {
            return None;
        }
        let right = self.config.mel_bin(self.m + 1);
        let item = (
            self.m,
            FilterBounds {
                left: self.left,
                center: self.center,
                right,
            },
        );
        self.left = self.center;
        self.center = right;
        self.m += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.config.n_mels + 1).saturating_sub(self.m);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Filters {}
