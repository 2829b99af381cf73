//! Forward real transform
//!
//! The spectrogram pipeline only needs the magnitude of the non-redundant
//! half of the spectrum. [`ForwardTransform`] is the seam; [`RealFft`] is
//! the `rustfft`-backed implementation used by default.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::debug;

use crate::error::{MelError, Result};

/// A forward real-input transform of fixed length
pub trait ForwardTransform {
    /// Transform length the instance was planned for
    fn len(&self) -> usize;

    /// Whether the transform has zero length
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transform the first `length` samples of `input`
    ///
    /// Writes the magnitude of bins `0..=length / 2` into the start of
    /// `output`. Entries of `output` past that are left unspecified.
    fn forward(&mut self, input: &[f32], output: &mut [f32], length: usize) -> Result<()>;
}

/// `rustfft`-backed forward transform
///
/// Planning and buffer allocation happen once in [`RealFft::new`];
/// [`ForwardTransform::forward`] does not allocate.
pub struct RealFft {
    len: usize,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RealFft {
    /// Plan a forward transform of `len` points
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(MelError::invalid_config("transform length must be positive"));
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(len);
        let scratch_len = fft.get_inplace_scratch_len();
        debug!(len, scratch_len, "planned forward FFT");

        Ok(Self {
            len,
            fft,
            buffer: vec![Complex::new(0.0, 0.0); len],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        })
    }
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("len", &self.len).finish()
    }
}

impl ForwardTransform for RealFft {
    fn len(&self) -> usize {
        self.len
    }

    fn forward(&mut self, input: &[f32], output: &mut [f32], length: usize) -> Result<()> {
        if length != self.len {
            return Err(MelError::size_mismatch("transform length", self.len, length));
        }
        if input.len() < length {
            return Err(MelError::size_mismatch("transform input", length, input.len()));
        }
        let bins = 1 + length / 2;
        if output.len() < bins {
            return Err(MelError::size_mismatch("transform output", bins, output.len()));
        }

        for (c, &x) in self.buffer.iter_mut().zip(&input[..length]) {
            *c = Complex::new(x, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (o, c) in output.iter_mut().zip(&self.buffer[..bins]) {
            *o = c.norm();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dc_signal() {
        let mut fft = RealFft::new(8).unwrap();
        let input = [1.0; 8];
        let mut output = [0.0; 8];
        fft.forward(&input, &mut output, 8).unwrap();

        assert_abs_diff_eq!(output[0], 8.0, epsilon = 1e-5);
        for &bin in &output[1..5] {
            assert_abs_diff_eq!(bin, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cosine_lands_in_its_bin() {
        let n = 64;
        let mut fft = RealFft::new(n).unwrap();
        let input: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 5.0 * i as f32 / n as f32).cos())
            .collect();
        let mut output = vec![0.0; n];
        fft.forward(&input, &mut output, n).unwrap();

        assert_abs_diff_eq!(output[5], n as f32 / 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(output[4], 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(output[6], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_length_contract() {
        let mut fft = RealFft::new(16).unwrap();
        let mut output = [0.0; 16];

        assert!(fft.forward(&[0.0; 16], &mut output, 8).is_err());
        assert!(fft.forward(&[0.0; 15], &mut output, 16).is_err());
        assert!(fft.forward(&[0.0; 16], &mut output[..8], 16).is_err());
        assert!(fft.forward(&[0.0; 32], &mut output[..9], 16).is_ok());
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(RealFft::new(0).is_err());
    }
}
