//! Spectrogram pipeline: one audio block in, one mel energy vector out
//!
//! The pipeline reuses its two buffers instead of allocating:
//!
//! 1. Hann-window the first `n_fft` samples of the audio block in place
//! 2. Zero the scratch buffer
//! 3. Transform the windowed block into the scratch buffer
//! 4. Replace the transform output with its power spectrum (same buffer)
//! 5. Aggregate mel energies into the front of the audio block
//!
//! Steps fail fast. Writes made by steps that already completed persist.

use tracing::debug;

use super::aggregate::mel_aggregate;
use super::filter_bank::MelFilterBankConfig;
use super::power::power_spectrum_in_place;
use crate::dsp::{apply_hann, fill, ForwardTransform, RealFft};
use crate::error::{MelError, Result};

/// Compute the mel spectrum of `audio_block` using `scratch` as work space
///
/// On success `audio_block[..n_mels]` holds the mel band energies. The rest
/// of the block holds windowed audio and should be treated as garbage.
///
/// # Errors
/// * `SizeMismatch` - if `audio_block` is shorter than `n_fft` or `n_mels`,
///   `scratch` is shorter than `n_fft`, or the transform length differs
///   from `n_fft`; checked before anything is written
/// * `DomainError` - if the filter bank does not fit the spectrum
/// * any error returned by `transform`, unchanged
pub fn melspectrogram<T: ForwardTransform + ?Sized>(
    config: MelFilterBankConfig,
    transform: &mut T,
    audio_block: &mut [f32],
    scratch: &mut [f32],
) -> Result<()> {
    let n_fft = config.n_fft();
    let n_mels = config.n_mels();
    let spec_length = config.spectrum_length();

    if audio_block.len() < n_fft {
        return Err(MelError::size_mismatch("audio block", n_fft, audio_block.len()));
    }
    if audio_block.len() < n_mels {
        return Err(MelError::size_mismatch("audio block", n_mels, audio_block.len()));
    }
    if scratch.len() < n_fft {
        return Err(MelError::size_mismatch("scratch buffer", n_fft, scratch.len()));
    }
    if transform.len() != n_fft {
        return Err(MelError::size_mismatch("transform length", n_fft, transform.len()));
    }

    apply_hann(&mut audio_block[..n_fft]);

    fill(scratch, 0.0);
    transform.forward(audio_block, scratch, n_fft)?;

    power_spectrum_in_place(&mut scratch[..spec_length], n_fft)?;
    mel_aggregate(config, &scratch[..spec_length], &mut audio_block[..n_mels])?;

    Ok(())
}

/// Mel spectrogram extractor owning its transform plan and scratch buffer
///
/// Construct once, then call [`MelSpectrogram::process`] per block. No
/// allocation happens after construction.
#[derive(Debug)]
pub struct MelSpectrogram {
    config: MelFilterBankConfig,
    fft: RealFft,
    scratch: Vec<f32>,
}

impl MelSpectrogram {
    /// Create an extractor for `config`
    ///
    /// # Errors
    /// * `DomainError` - if the filter bank does not fit the spectrum
    pub fn new(config: MelFilterBankConfig) -> Result<Self> {
        config.check_bounds()?;
        let fft = RealFft::new(config.n_fft())?;
        debug!(
            n_mels = config.n_mels(),
            n_fft = config.n_fft(),
            samplerate = config.samplerate(),
            "created mel spectrogram extractor"
        );

        Ok(Self {
            config,
            fft,
            scratch: vec![0.0; config.n_fft()],
        })
    }

    /// Filter bank configuration
    pub fn config(&self) -> MelFilterBankConfig {
        self.config
    }

    /// Number of mel bands written per block
    pub fn n_mels(&self) -> usize {
        self.config.n_mels()
    }

    /// Replace the front of `block` with its mel band energies
    ///
    /// Returns the mel energies as a sub-slice of `block`.
    pub fn process<'a>(&mut self, block: &'a mut [f32]) -> Result<&'a [f32]> {
        melspectrogram(self.config, &mut self.fft, block, &mut self.scratch)?;
        Ok(&block[..self.config.n_mels()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingTransform;

    impl ForwardTransform for FailingTransform {
        fn len(&self) -> usize {
            512
        }

        fn forward(&mut self, _: &[f32], _: &mut [f32], _: usize) -> Result<()> {
            Err(MelError::Transform {
                reason: "device busy".to_string(),
            })
        }
    }

    fn config() -> MelFilterBankConfig {
        MelFilterBankConfig::new(40, 0.0, 8000.0, 512, 16000).unwrap()
    }

    fn tone(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 16000.0).sin())
            .collect()
    }

    #[test]
    fn test_rejects_short_buffers_before_writing() {
        let mut fft = RealFft::new(512).unwrap();
        let original = tone(1000.0, 256);
        let mut block = original.clone();
        let mut scratch = vec![0.0; 512];

        let err = melspectrogram(config(), &mut fft, &mut block, &mut scratch).unwrap_err();
        assert!(matches!(err, MelError::SizeMismatch { expected: 512, .. }));
        assert_eq!(block, original);

        let mut block = tone(1000.0, 512);
        let mut short_scratch = vec![0.0; 100];
        assert!(melspectrogram(config(), &mut fft, &mut block, &mut short_scratch).is_err());
    }

    #[test]
    fn test_more_mels_than_block_rejected() {
        // 600 bands do not fit in a 512-sample block
        let cfg = MelFilterBankConfig::new(600, 0.0, 8000.0, 512, 16000).unwrap();
        let mut fft = RealFft::new(512).unwrap();
        let mut block = vec![0.0; 512];
        let mut scratch = vec![0.0; 512];
        assert!(matches!(
            melspectrogram(cfg, &mut fft, &mut block, &mut scratch),
            Err(MelError::SizeMismatch { expected: 600, .. })
        ));
    }

    #[test]
    fn test_transform_length_must_match() {
        let mut fft = RealFft::new(256).unwrap();
        let mut block = vec![0.0; 512];
        let mut scratch = vec![0.0; 512];
        assert!(matches!(
            melspectrogram(config(), &mut fft, &mut block, &mut scratch),
            Err(MelError::SizeMismatch { what: "transform length", .. })
        ));
    }

    #[test]
    fn test_transform_error_propagates() {
        let mut block = tone(1000.0, 512);
        let mut scratch = vec![0.0; 512];
        let err = melspectrogram(config(), &mut FailingTransform, &mut block, &mut scratch)
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSFORM_ERROR");
    }

    #[test]
    fn test_silence_gives_zero_energy() {
        let mut extractor = MelSpectrogram::new(config()).unwrap();
        let mut block = vec![0.0; 512];
        let mels = extractor.process(&mut block).unwrap();
        assert_eq!(mels.len(), 40);
        assert!(mels.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tone_energy_peaks_near_tone() {
        let mut extractor = MelSpectrogram::new(config()).unwrap();
        let mut low = tone(300.0, 512);
        let mut high = tone(3000.0, 512);

        let low_peak = argmax(extractor.process(&mut low).unwrap());
        let high_peak = argmax(extractor.process(&mut high).unwrap());
        assert!(low_peak < high_peak);
    }

    #[test]
    fn test_extractor_rejects_out_of_range_bank() {
        let cfg = MelFilterBankConfig::new(10, 0.0, 16000.0, 512, 16000).unwrap();
        assert!(matches!(
            MelSpectrogram::new(cfg),
            Err(MelError::DomainError { .. })
        ));
    }

    fn argmax(values: &[f32]) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }
}
