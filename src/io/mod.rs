//! Audio input types
//!
//! Decoding and capture happen outside this crate. Callers hand in mono
//! `f32` samples as an [`AudioFrame`], or feed a [`BlockQueue`] from a live
//! source.

pub mod block_queue;
pub mod frame;

pub use block_queue::{AudioBlock, BlockQueue};
pub use frame::AudioFrame;
