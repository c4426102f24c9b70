//! Orchestration and result types
//!
//! - [`batch`]: windowed chord analysis over a full buffer
//! - [`streaming`]: per-block chord analysis with a caller-owned history
//! - [`worker`]: batch analysis on a background thread
//! - [`scheduler`]: yield points and cancellation
//! - [`result`], [`metadata`]: combined analysis output

pub mod batch;
pub mod metadata;
pub mod result;
pub mod scheduler;
pub mod streaming;
pub mod worker;
