//! Power spectrum from forward transform coefficients
//!
//! `power[i] = |coeff[i]|^2 / n_fft` over the `1 + n_fft / 2` non-redundant
//! bins.

use crate::error::{MelError, Result};

/// Compute the scaled power spectrum of `coeffs` into `out`
///
/// # Errors
/// * `SizeMismatch` - if `coeffs` is shorter than `1 + n_fft / 2` or `out`
///   is not exactly that long
pub fn power_spectrum(coeffs: &[f32], out: &mut [f32], n_fft: usize) -> Result<()> {
    let spec_length = 1 + n_fft / 2;
    if coeffs.len() < spec_length {
        return Err(MelError::size_mismatch(
            "transform coefficients",
            spec_length,
            coeffs.len(),
        ));
    }
    if out.len() != spec_length {
        return Err(MelError::size_mismatch(
            "power spectrum output",
            spec_length,
            out.len(),
        ));
    }

    let scale = 1.0 / n_fft as f32;
    for (o, &c) in out.iter_mut().zip(&coeffs[..spec_length]) {
        *o = scale * c.abs().powi(2);
    }
    Ok(())
}

/// Overwrite the first `1 + n_fft / 2` coefficients of `buf` with their power
///
/// The computation is elementwise, so the transform output can be replaced
/// by its own power spectrum without a second buffer. Entries past the
/// spectrum are left untouched.
///
/// # Errors
/// * `SizeMismatch` - if `buf` is shorter than `1 + n_fft / 2`
pub fn power_spectrum_in_place(buf: &mut [f32], n_fft: usize) -> Result<()> {
    let spec_length = 1 + n_fft / 2;
    if buf.len() < spec_length {
        return Err(MelError::size_mismatch(
            "transform coefficients",
            spec_length,
            buf.len(),
        ));
    }

    let scale = 1.0 / n_fft as f32;
    for v in &mut buf[..spec_length] {
        *v = scale * v.abs().powi(2);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_output_length_must_be_exact() {
        let coeffs = vec![1.0; 512];

        let mut out = vec![0.0; 257];
        assert!(power_spectrum(&coeffs, &mut out, 512).is_ok());

        for len in [0, 256, 258, 512] {
            let mut out = vec![0.0; len];
            match power_spectrum(&coeffs, &mut out, 512) {
                Err(MelError::SizeMismatch {
                    expected, actual, ..
                }) => {
                    assert_eq!(expected, 257);
                    assert_eq!(actual, len);
                }
                other => panic!("expected SizeMismatch for {}, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_short_coefficients_rejected() {
        let coeffs = vec![1.0; 256];
        let mut out = vec![0.0; 257];
        assert!(matches!(
            power_spectrum(&coeffs, &mut out, 512),
            Err(MelError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_scaling() {
        let coeffs = [2.0, -4.0, 0.0, 1.0, 99.0];
        let mut out = [0.0; 3];
        power_spectrum(&coeffs, &mut out, 4).unwrap();
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 4.0);
        assert_relative_eq!(out[2], 0.0);
    }

    #[test]
    fn test_in_place_matches_out_of_place() {
        let coeffs: Vec<f32> = (0..16).map(|i| (i as f32 * 0.37).sin() * 3.0).collect();
        let mut expected = vec![0.0; 9];
        power_spectrum(&coeffs, &mut expected, 16).unwrap();

        let mut buf = coeffs.clone();
        power_spectrum_in_place(&mut buf, 16).unwrap();
        assert_eq!(&buf[..9], &expected[..]);
        assert_eq!(&buf[9..], &coeffs[9..]);
    }
}
