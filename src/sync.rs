//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The halt word shared between the controller and one worker.
///
/// The controller raises it to cancel the worker's current task; the
/// search kernels poll it after every child node and bail out with their
/// best result so far. The worker lowers it again when it picks up the
/// next task, so the flag is monotonic within a search epoch. A single
/// atomic is the only cross-thread state during search; no locks.
#[derive(Clone, Debug, Default)]
pub struct HaltFlag(Arc<AtomicBool>);

impl HaltFlag {
    #[must_use]
    pub fn new() -> HaltFlag {
        HaltFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Signal the worker to stop.
    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Lower the flag for a new search epoch.
    #[inline]
    pub fn lower(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// The underlying atomic, in the shape the search kernels take.
    #[inline]
    #[must_use]
    pub fn as_atomic(&self) -> &AtomicBool {
        &self.0
    }
}
