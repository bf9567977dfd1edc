//! Stop conditions checked between search nodes

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Best color count found by any worker of an attempt
///
/// Once it drops to the attempt's color budget every other worker stops.
#[derive(Debug)]
pub(crate) struct SharedBound {
    best: AtomicUsize,
}

impl SharedBound {
    pub(crate) fn new(initial: usize) -> Self {
        Self {
            best: AtomicUsize::new(initial),
        }
    }

    pub(crate) fn get(&self) -> usize {
        self.best.load(Ordering::Acquire)
    }

    /// Lowers the bound, returning true if `colors` improved it
    pub(crate) fn offer(&self, colors: usize) -> bool {
        self.best.fetch_min(colors, Ordering::AcqRel) > colors
    }
}

/// Why a worker stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Halt {
    Time,
    Memory,
    Cancelled,
}

#[derive(Debug, Clone)]
pub(crate) struct StopConditions {
    pub(crate) deadline: Option<Instant>,
    pub(crate) memory_limit: Option<usize>,
    pub(crate) shared: Arc<SharedBound>,
}

impl StopConditions {
    /// Checks the limits for a worker searching with `colors` colors whose
    /// current footprint is `memory` bytes
    pub(crate) fn check(&self, colors: usize, memory: usize) -> Option<Halt> {
        if self.shared.get() <= colors {
            return Some(Halt::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(Halt::Time);
        }
        if self.memory_limit.is_some_and(|limit| memory > limit) {
            return Some(Halt::Memory);
        }
        None
    }
}
