//! Bounded queue of fixed-size audio blocks for live analysis
//!
//! A capture callback pushes arbitrary runs of samples; the queue cuts them
//! into blocks of `block_size` samples, each stamped with its start time in
//! the stream. When the consumer falls behind and the queue is full, the
//! oldest unprocessed block is dropped. Start times come from the running
//! sample count, so blocks that survive keep their true timestamps.

use std::collections::VecDeque;

use crate::error::AnalysisError;
use crate::io::AudioFrame;

/// One block of mono samples and its position in the stream
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    /// Seconds since stream start of the first sample
    pub start_time: f64,

    /// Mono samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBlock {
    /// Borrow the block as an analysis frame
    pub fn frame(&self) -> Result<AudioFrame<'_>, AnalysisError> {
        AudioFrame::new(&self.samples, self.sample_rate)
    }
}

/// Bounded drop-oldest block queue
#[derive(Debug)]
pub struct BlockQueue {
    block_size: usize,
    capacity: usize,
    sample_rate: u32,
    pending: Vec<f32>,
    blocks: VecDeque<AudioBlock>,
    samples_seen: u64,
    dropped: u64,
}

impl BlockQueue {
    /// Create a queue holding at most `capacity` blocks of `block_size` samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if any argument is zero.
    pub fn new(block_size: usize, capacity: usize, sample_rate: u32) -> Result<Self, AnalysisError> {
        if block_size == 0 || capacity == 0 || sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Block queue needs non-zero block size, capacity and rate (got {}, {}, {})",
                block_size, capacity, sample_rate
            )));
        }
        Ok(Self {
            block_size,
            capacity,
            sample_rate,
            pending: Vec::with_capacity(block_size),
            blocks: VecDeque::with_capacity(capacity),
            samples_seen: 0,
            dropped: 0,
        })
    }

    /// Append samples, completing as many blocks as possible
    ///
    /// Returns the number of blocks dropped by this call.
    pub fn push(&mut self, samples: &[f32]) -> usize {
        let mut dropped_now = 0;
        let mut rest = samples;
        while !rest.is_empty() {
            let take = (self.block_size - self.pending.len()).min(rest.len());
            self.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.pending.len() == self.block_size {
                let block = AudioBlock {
                    start_time: self.samples_seen as f64 / self.sample_rate as f64,
                    samples: std::mem::replace(&mut self.pending, Vec::with_capacity(self.block_size)),
                    sample_rate: self.sample_rate,
                };
                self.samples_seen += self.block_size as u64;

                if self.blocks.len() == self.capacity {
                    if let Some(old) = self.blocks.pop_front() {
                        dropped_now += 1;
                        self.dropped += 1;
                        log::warn!(
                            "Block queue full ({} blocks), dropped block at {:.3}s ({} dropped total)",
                            self.capacity,
                            old.start_time,
                            self.dropped
                        );
                    }
                }
                self.blocks.push_back(block);
            }
        }
        dropped_now
    }

    /// Take the oldest queued block
    pub fn pop(&mut self) -> Option<AudioBlock> {
        self.blocks.pop_front()
    }

    /// Queued complete blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when no complete block is queued
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Samples waiting for their block to fill
    pub fn pending_samples(&self) -> usize {
        self.pending.len()
    }

    /// Blocks dropped since creation
    pub fn dropped_blocks(&self) -> u64 {
        self.dropped
    }

    /// Samples per block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Maximum queued blocks
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_are_cut_and_stamped() {
        let mut queue = BlockQueue::new(4, 8, 4).unwrap();
        assert_eq!(queue.push(&[0.1; 6]), 0);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending_samples(), 2);
        queue.push(&[0.2; 2]);

        let first = queue.pop().unwrap();
        let second = queue.pop().unwrap();
        assert_eq!(first.start_time, 0.0);
        assert_eq!(second.start_time, 1.0);
        assert_eq!(second.samples, vec![0.1, 0.1, 0.2, 0.2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut queue = BlockQueue::new(2, 2, 2).unwrap();
        let dropped = queue.push(&[0.0; 8]);
        assert_eq!(dropped, 2);
        assert_eq!(queue.dropped_blocks(), 2);
        assert_eq!(queue.len(), 2);

        // Survivors keep their own start times
        assert_eq!(queue.pop().unwrap().start_time, 2.0);
        assert_eq!(queue.pop().unwrap().start_time, 3.0);
    }

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(BlockQueue::new(0, 4, 44100).is_err());
        assert!(BlockQueue::new(1024, 0, 44100).is_err());
        assert!(BlockQueue::new(1024, 4, 0).is_err());
    }

    #[test]
    fn test_block_frame() {
        let mut queue = BlockQueue::new(3, 1, 8000).unwrap();
        queue.push(&[0.5, -0.5, 0.5]);
        let block = queue.pop().unwrap();
        let frame = block.frame().unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.sample_rate(), 8000);
    }
}
