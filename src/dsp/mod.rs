//! Signal processing primitives
//!
//! Windowing, fill and the forward real transform consumed by the mel
//! pipeline.

mod fft;
mod window;

pub use fft::{ForwardTransform, RealFft};
pub use window::{apply_hann, fill};
