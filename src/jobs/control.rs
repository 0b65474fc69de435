//! Cancellation state shared between the interrupt listener and jobs
//!
//! Two kinds of cancellation exist. Every job owns a private [`StopSignal`]
//! that only the job registry (or whoever created the job) ever sets. On top
//! of that, [`ForegroundControl`] tracks whether a foreground job is running
//! and whether an interrupt asked it to stop. Background jobs never look at
//! the foreground state, so an interrupt cannot reach them.

use super::{JobError, JobResult};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Cooperative stop flag polled by a job between bounded waits
///
/// Clones share the same flag. Once requested it stays set.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the job holding this signal to stop
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// What the interrupt listener should do with an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// A foreground job is running and has been asked to stop
    StopRequested,
    /// Nothing runs in the foreground; the console should exit
    Exit,
}

const IDLE: u8 = 0;
const ACTIVE: u8 = 1;
const STOPPING: u8 = 2;

/// Foreground status plus its stop flag, folded into one atomic state
///
/// `IDLE -> ACTIVE` happens in [`ForegroundControl::acquire`], `ACTIVE ->
/// STOPPING` in [`ForegroundControl::interrupt`], and any state returns to
/// `IDLE` when the [`ForegroundGuard`] drops. The stop flag therefore can only
/// be observed while a foreground job is active.
#[derive(Debug, Default)]
pub struct ForegroundControl {
    state: AtomicU8,
}

impl ForegroundControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// True while a foreground job holds the guard
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) != IDLE
    }

    /// True once an interrupt hit the running foreground job
    pub fn stop_requested(&self) -> bool {
        self.state.load(Ordering::Acquire) == STOPPING
    }

    /// Mark a foreground job as running
    ///
    /// Fails with [`JobError::ForegroundBusy`] when another foreground job
    /// already holds the guard.
    pub fn acquire(self: &Arc<Self>) -> JobResult<ForegroundGuard> {
        self.state
            .compare_exchange(IDLE, ACTIVE, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| JobError::ForegroundBusy)?;
        Ok(ForegroundGuard {
            control: Arc::clone(self),
        })
    }

    /// Decide what an interrupt means right now
    ///
    /// Only flips flags; never blocks or performs I/O.
    pub fn interrupt(&self) -> InterruptOutcome {
        match self
            .state
            .compare_exchange(ACTIVE, STOPPING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) | Err(STOPPING) => InterruptOutcome::StopRequested,
            Err(_) => InterruptOutcome::Exit,
        }
    }
}

/// Proof that the holder is the single foreground job
///
/// Dropping it clears both the foreground status and its stop flag, ready for
/// the next foreground job.
#[derive(Debug)]
pub struct ForegroundGuard {
    control: Arc<ForegroundControl>,
}

impl ForegroundGuard {
    pub fn stop_requested(&self) -> bool {
        self.control.stop_requested()
    }
}

impl Drop for ForegroundGuard {
    fn drop(&mut self) {
        self.control.state.store(IDLE, Ordering::Release);
    }
}
