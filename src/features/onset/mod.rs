//! Onset detection
//!
//! A single energy-rise detector over a decimated signal. Onsets are plain
//! times in seconds since the start of the analyzed buffer.

pub mod energy;

pub use energy::{OnsetConfig, OnsetDetector};
