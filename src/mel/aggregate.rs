//! Mel band energies from a power spectrum
//!
//! Applies the triangular filter bank of [`MelFilterBankConfig`] directly
//! from the edge bins, without materialising a weight matrix.

use super::filter_bank::MelFilterBankConfig;
use crate::error::{MelError, Result};

/// Aggregate `power` into `out[m - 1]` for every filter `m`
///
/// No normalization is applied to the filters.
///
/// # Errors
/// * `SizeMismatch` - if `power` is shorter than `1 + n_fft / 2` or `out`
///   is not exactly `n_mels` long
/// * `DomainError` - if a filter reaches below bin 0 or past the spectrum
pub fn mel_aggregate(config: MelFilterBankConfig, power: &[f32], out: &mut [f32]) -> Result<()> {
    let max_bin = config.spectrum_length();
    if power.len() < max_bin {
        return Err(MelError::size_mismatch("power spectrum", max_bin, power.len()));
    }
    if out.len() != config.n_mels() {
        return Err(MelError::size_mismatch(
            "mel energy output",
            config.n_mels(),
            out.len(),
        ));
    }

    for (m, bounds) in config.filters() {
        bounds.check(m, max_bin)?;

        // Bounds are in 0..=max_bin past this point
        let left = bounds.left as usize;
        let center = bounds.center as usize;
        let right = bounds.right as usize;

        let mut val = 0.0f32;
        if center > left {
            let width = (center - left) as f32;
            for (k, &p) in power.iter().enumerate().take(center).skip(left) {
                let weight = (k - left) as f32 / width;
                val += p * weight;
            }
        }
        if right > center {
            let width = (right - center) as f32;
            for (k, &p) in power.iter().enumerate().take(right).skip(center) {
                let weight = (right - k) as f32 / width;
                val += p * weight;
            }
        }

        out[m - 1] = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(n_mels: usize) -> MelFilterBankConfig {
        MelFilterBankConfig::new(n_mels, 0.0, 8000.0, 512, 16000).unwrap()
    }

    #[test]
    fn test_output_length_must_match_n_mels() {
        let power = vec![1.0; 257];
        let mut out = vec![0.0; 39];
        assert!(matches!(
            mel_aggregate(config(40), &power, &mut out),
            Err(MelError::SizeMismatch { expected: 40, .. })
        ));
    }

    #[test]
    fn test_short_spectrum_rejected() {
        let power = vec![1.0; 256];
        let mut out = vec![0.0; 40];
        assert!(matches!(
            mel_aggregate(config(40), &power, &mut out),
            Err(MelError::SizeMismatch { expected: 257, .. })
        ));
    }

    #[test]
    fn test_matches_weight_sum() {
        let cfg = config(24);
        let power: Vec<f32> = (0..257).map(|k| 1.0 + (k as f32 * 0.1).cos()).collect();
        let mut out = vec![0.0; 24];
        mel_aggregate(cfg, &power, &mut out).unwrap();

        for (m, bounds) in cfg.filters() {
            let expected: f32 = (0..257)
                .map(|k| power[k] * bounds.weight(k as i64))
                .sum();
            assert_relative_eq!(out[m - 1], expected, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_filters_are_not_normalized() {
        // With a flat spectrum each band equals its filter's area,
        // which grows with the bandwidth in bins
        let cfg = config(10);
        let power = vec![1.0; 257];
        let mut out = vec![0.0; 10];
        mel_aggregate(cfg, &power, &mut out).unwrap();

        for (m, b) in cfg.filters() {
            let area = (b.right - b.left) as f32 / 2.0;
            assert_relative_eq!(out[m - 1], area, max_relative = 1e-5);
        }
        assert!(out[9] > out[0]);
    }

    #[test]
    fn test_fmax_above_nyquist_is_domain_error() {
        let cfg = MelFilterBankConfig::new(1, 0.0, 16000.0, 512, 16000).unwrap();
        let power = vec![1.0; 257];
        let mut out = vec![0.0; 1];
        assert!(matches!(
            mel_aggregate(cfg, &power, &mut out),
            Err(MelError::DomainError { filter: 1, .. })
        ));
    }

    #[test]
    fn test_zero_width_edges_are_skipped() {
        // 64 bands on a 64-point transform gives several filters whose
        // edges collapse onto the same bin
        let cfg = MelFilterBankConfig::new(64, 0.0, 8000.0, 64, 16000).unwrap();
        assert!(cfg.filters().any(|(_, b)| b.left == b.center || b.center == b.right));

        let power = vec![1.0; 33];
        let mut out = vec![0.0; 64];
        mel_aggregate(cfg, &power, &mut out).unwrap();
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
