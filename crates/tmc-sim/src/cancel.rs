//! Cooperative cancellation for the tick loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable flag checked once per tick by [`Run::run`][crate::Run::run].
///
/// Cancellation is a normal exit: teardown still runs, observers see
/// `on_run_end`, and the run returns its summary.  Clones share the flag, so
/// a token handed to a signal handler or another thread stops the loop at
/// the next tick boundary.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stop at the next tick boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
