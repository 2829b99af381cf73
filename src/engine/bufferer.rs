//! Double-buffered block accumulator
//!
//! Assembles a stream of single samples into fixed-length blocks. Two slots
//! of `block_length` samples alternate: one is always being filled, the
//! other is either empty or holds a completed block waiting for the
//! consumer. There is at most one block of lookahead; a consumer that falls
//! behind causes [`BufferStatus::Overrun`], the producer never blocks.
//!
//! For sharing between two threads without locks see
//! [`handoff`](super::handoff).

use tracing::trace;

use crate::error::{MelError, Result};

/// Outcome of [`AudioBufferer::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferStatus {
    /// The sample was stored, the current block is not yet full
    Accumulating,
    /// A full block was published and is available from `ready_block`
    BlockReady,
    /// A full block could not be published because the previous one has not
    /// been cleared
    Overrun,
}

/// State of one of the two slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Idle, not holding a block
    Empty,
    /// Write target receiving samples
    Filling,
    /// Holds a completed block awaiting the consumer
    Ready,
}

/// Two-slot single-producer/single-consumer block accumulator
#[derive(Debug, Clone)]
pub struct AudioBufferer {
    block_length: usize,
    slots: [Box<[f32]>; 2],
    states: [SlotState; 2],
    write_target: usize,
    write_offset: usize,
}

impl AudioBufferer {
    /// Create a bufferer with two self-owned slots of `block_length` samples
    ///
    /// # Errors
    /// * `InvalidConfig` - if `block_length` is zero
    pub fn new(block_length: usize) -> Result<Self> {
        if block_length == 0 {
            return Err(MelError::invalid_config("block length must be positive"));
        }
        Ok(Self::with_slots(
            vec![0.0; block_length].into_boxed_slice(),
            vec![0.0; block_length].into_boxed_slice(),
        ))
    }

    /// Create a bufferer over two caller-provided buffers
    ///
    /// The block length is the buffers' length. Their contents are ignored.
    ///
    /// # Errors
    /// * `SizeMismatch` - if the buffers differ in length
    /// * `InvalidConfig` - if the buffers are empty
    pub fn from_buffers(first: Vec<f32>, second: Vec<f32>) -> Result<Self> {
        if first.len() != second.len() {
            return Err(MelError::size_mismatch(
                "second block buffer",
                first.len(),
                second.len(),
            ));
        }
        if first.is_empty() {
            return Err(MelError::invalid_config("block length must be positive"));
        }
        Ok(Self::with_slots(
            first.into_boxed_slice(),
            second.into_boxed_slice(),
        ))
    }

    fn with_slots(first: Box<[f32]>, second: Box<[f32]>) -> Self {
        let mut bufferer = Self {
            block_length: first.len(),
            slots: [first, second],
            states: [SlotState::Filling, SlotState::Empty],
            write_target: 0,
            write_offset: 0,
        };
        bufferer.reset();
        bufferer
    }

    /// Write to the first slot from offset 0 and forget any ready block
    pub fn reset(&mut self) {
        self.write_target = 0;
        self.states = [SlotState::Filling, SlotState::Empty];
        self.write_offset = 0;
    }

    /// Append one sample
    ///
    /// When the write slot fills up it is published as the ready block and
    /// writing moves to the other slot. If the previous block has not been
    /// cleared the full slot stays as it is and `Overrun` is returned; while
    /// it stays stalled further samples are dropped with `Overrun`. Once the
    /// consumer clears the ready block, the next `add` publishes the stalled
    /// block and reports `BlockReady`.
    pub fn add(&mut self, sample: f32) -> BufferStatus {
        let mut published = false;

        if self.write_offset == self.block_length {
            if self.ready_slot().is_some() {
                return BufferStatus::Overrun;
            }
            self.publish();
            published = true;
        }

        self.slots[self.write_target][self.write_offset] = sample;
        self.write_offset += 1;

        if published {
            return BufferStatus::BlockReady;
        }
        if self.write_offset < self.block_length {
            return BufferStatus::Accumulating;
        }

        if self.ready_slot().is_some() {
            trace!(slot = self.write_target, "block overrun, consumer has not cleared");
            return BufferStatus::Overrun;
        }
        self.publish();
        BufferStatus::BlockReady
    }

    fn publish(&mut self) {
        self.states[self.write_target] = SlotState::Ready;
        self.write_target ^= 1;
        self.states[self.write_target] = SlotState::Filling;
        self.write_offset = 0;
    }

    fn ready_slot(&self) -> Option<usize> {
        self.states.iter().position(|&s| s == SlotState::Ready)
    }

    /// Whether a completed block is waiting for the consumer
    pub fn is_ready(&self) -> bool {
        self.ready_slot().is_some()
    }

    /// The completed block, if any
    pub fn ready_block(&self) -> Option<&[f32]> {
        self.ready_slot().map(|i| &*self.slots[i])
    }

    /// Mutable access to the completed block, for in-place processing
    pub fn ready_block_mut(&mut self) -> Option<&mut [f32]> {
        match self.ready_slot() {
            Some(i) => Some(&mut *self.slots[i]),
            None => None,
        }
    }

    /// Release the ready block so the next full block can be published
    pub fn clear_ready(&mut self) {
        if let Some(i) = self.ready_slot() {
            self.states[i] = SlotState::Empty;
        }
    }

    /// Discard the samples accumulated in the write slot
    ///
    /// After an overrun this drops the stalled block instead of waiting to
    /// publish it.
    pub fn drop_pending(&mut self) {
        self.write_offset = 0;
    }

    /// Samples per block
    pub fn block_length(&self) -> usize {
        self.block_length
    }

    /// Samples accumulated in the write slot
    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// State of slot `index` (0 or 1)
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.states.get(index).copied()
    }
}
