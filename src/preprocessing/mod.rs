//! Audio preprocessing modules
//!
//! - Channel mixing (interleaved or split channels to mono)
//! - Decimation (integer-factor box averaging for the onset path)

pub mod channel_mixer;
pub mod decimate;
