//! Audio Engine Module
//!
//! Sample intake ahead of feature extraction:
//! - Double-buffered block accumulation
//! - Lock-free producer/consumer block handoff
//! - WAV file input

pub mod bufferer;
pub mod handoff;
pub mod io;

pub use bufferer::{AudioBufferer, BufferStatus, SlotState};
pub use handoff::{handoff, BlockConsumer, BlockProducer};
pub use io::{generate_test_tone, read_mono_wav, write_mono_wav, MonoAudio};
