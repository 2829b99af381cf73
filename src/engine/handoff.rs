//! Lock-free block handoff between two threads
//!
//! Splits the double buffer of [`AudioBufferer`](super::AudioBufferer) into
//! a [`BlockProducer`] (e.g. an audio callback) and a [`BlockConsumer`]
//! (e.g. a feature extraction task). The producer only writes its current
//! slot and publishes it; the consumer only reads the published slot and
//! releases it. Publication is a single atomic marker stored with `Release`
//! and read with `Acquire`, so the consumer always sees a complete block.
//!
//! Samples are kept as `f32` bit patterns in `AtomicU32` cells so both sides
//! can touch the slots without `unsafe`.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

use super::bufferer::BufferStatus;
use crate::error::{MelError, Result};

/// Marker value meaning no slot is published
const NO_BLOCK: usize = usize::MAX;

struct Shared {
    block_length: usize,
    slots: [Box<[AtomicU32]>; 2],
    ready: AtomicUsize,
}

impl Shared {
    fn ready_slot(&self) -> Option<usize> {
        match self.ready.load(Ordering::Acquire) {
            NO_BLOCK => None,
            slot => Some(slot),
        }
    }
}

/// Create a connected producer/consumer pair with `block_length`-sample slots
///
/// # Errors
/// * `InvalidConfig` - if `block_length` is zero
pub fn handoff(block_length: usize) -> Result<(BlockProducer, BlockConsumer)> {
    if block_length == 0 {
        return Err(MelError::invalid_config("block length must be positive"));
    }

    let slot = || (0..block_length).map(|_| AtomicU32::new(0)).collect::<Box<[_]>>();
    let shared = Arc::new(Shared {
        block_length,
        slots: [slot(), slot()],
        ready: AtomicUsize::new(NO_BLOCK),
    });

    Ok((
        BlockProducer {
            shared: Arc::clone(&shared),
            write_target: 0,
            write_offset: 0,
        },
        BlockConsumer { shared },
    ))
}

/// Producer half: appends samples and publishes full blocks
pub struct BlockProducer {
    shared: Arc<Shared>,
    write_target: usize,
    write_offset: usize,
}

impl BlockProducer {
    /// Append one sample
    ///
    /// Same status contract as [`AudioBufferer::add`](super::AudioBufferer::add):
    /// a stalled full slot drops incoming samples with `Overrun` until the
    /// consumer releases its block, then it is published on the next call.
    pub fn add(&mut self, sample: f32) -> BufferStatus {
        let block_length = self.shared.block_length;
        let mut published = false;

        if self.write_offset == block_length {
            if self.shared.ready_slot().is_some() {
                return BufferStatus::Overrun;
            }
            self.publish();
            published = true;
        }

        self.shared.slots[self.write_target][self.write_offset]
            .store(sample.to_bits(), Ordering::Relaxed);
        self.write_offset += 1;

        if published {
            return BufferStatus::BlockReady;
        }
        if self.write_offset < block_length {
            return BufferStatus::Accumulating;
        }

        if self.shared.ready_slot().is_some() {
            trace!(slot = self.write_target, "block overrun, consumer has not released");
            return BufferStatus::Overrun;
        }
        self.publish();
        BufferStatus::BlockReady
    }

    fn publish(&mut self) {
        self.shared.ready.store(self.write_target, Ordering::Release);
        self.write_target ^= 1;
        self.write_offset = 0;
    }

    /// Discard the samples accumulated in the write slot
    pub fn drop_pending(&mut self) {
        self.write_offset = 0;
    }

    /// Samples per block
    pub fn block_length(&self) -> usize {
        self.shared.block_length
    }
}

/// Consumer half: copies out published blocks and releases them
pub struct BlockConsumer {
    shared: Arc<Shared>,
}

impl BlockConsumer {
    /// Whether a published block is waiting
    pub fn is_ready(&self) -> bool {
        self.shared.ready_slot().is_some()
    }

    /// Copy the published block into `out` and release it
    ///
    /// Returns `Ok(false)` without touching `out` when no block is waiting.
    ///
    /// # Errors
    /// * `SizeMismatch` - if `out` is not exactly one block long
    pub fn take_into(&mut self, out: &mut [f32]) -> Result<bool> {
        if out.len() != self.shared.block_length {
            return Err(MelError::size_mismatch(
                "block output",
                self.shared.block_length,
                out.len(),
            ));
        }

        let Some(slot) = self.shared.ready_slot() else {
            return Ok(false);
        };
        for (o, cell) in out.iter_mut().zip(self.shared.slots[slot].iter()) {
            *o = f32::from_bits(cell.load(Ordering::Relaxed));
        }
        self.shared.ready.store(NO_BLOCK, Ordering::Release);
        Ok(true)
    }

    /// Samples per block
    pub fn block_length(&self) -> usize {
        self.shared.block_length
    }
}
