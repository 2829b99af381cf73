//! In-place vector primitives used by the spectrogram pipeline

use std::f32::consts::PI;

/// Multiply `buf` by a symmetric Hann window of the same length
///
/// `w[i] = 0.5 * (1 - cos(2πi / (N - 1)))`. Buffers shorter than two
/// samples are left unchanged.
pub fn apply_hann(buf: &mut [f32]) {
    let len = buf.len();
    if len < 2 {
        return;
    }

    let denom = (len - 1) as f32;
    for (i, sample) in buf.iter_mut().enumerate() {
        let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos());
        *sample *= w;
    }
}

/// Set every element of `buf` to `value`
#[inline]
pub fn fill(buf: &mut [f32], value: f32) {
    buf.fill(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hann_endpoints_and_peak() {
        let mut buf = vec![1.0; 9];
        apply_hann(&mut buf);

        assert_abs_diff_eq!(buf[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buf[8], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buf[4], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buf[2], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_hann_is_symmetric() {
        let mut buf = vec![1.0; 64];
        apply_hann(&mut buf);
        for i in 0..32 {
            assert_abs_diff_eq!(buf[i], buf[63 - i], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hann_short_buffers_untouched() {
        let mut empty: [f32; 0] = [];
        apply_hann(&mut empty);

        let mut one = [0.7];
        apply_hann(&mut one);
        assert_eq!(one, [0.7]);
    }

    #[test]
    fn test_fill() {
        let mut buf = vec![3.0; 5];
        fill(&mut buf, 0.0);
        assert!(buf.iter().all(|&v| v == 0.0));
    }
}
