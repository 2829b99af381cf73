//! HTK mel scale
//!
//! `mel = 2595 * log10(1 + hz / 700)`. This matches librosa with
//! `htk=True`, not its default Slaney scale.

/// Convert a frequency in Hz to mels
#[inline]
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mels back to a frequency in Hz
#[inline]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}
