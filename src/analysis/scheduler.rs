//! Cooperative scheduling and cancellation for long analyses

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Yield point invoked by batch analysis every few windows
pub trait Scheduler: Send + Sync {
    /// Give other work a chance to run
    fn yield_now(&self);
}

/// Yields the current OS thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

impl Scheduler for ThreadYield {
    fn yield_now(&self) {
        std::thread::yield_now();
    }
}

/// Never yields; for dedicated worker threads and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoYield;

impl Scheduler for NoYield {
    fn yield_now(&self) {}
}

/// Shared cancellation flag, checked between analysis windows
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
