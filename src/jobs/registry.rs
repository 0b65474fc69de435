//! Background job bookkeeping
//!
//! The registry is owned by the console's control flow and only mutated from
//! there, so it needs no locking of its own. Jobs themselves never touch it.

use super::{JobDescriptor, JobError, JobResult, StopSignal};
use std::collections::BTreeMap;
use std::fmt;
use tokio::task::JoinHandle;

/// Identifier of a background job, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listing row for one registered job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub id: JobId,
    pub descriptor: JobDescriptor,
    /// The task already returned (stream failure, for instance) but nobody killed it yet
    pub finished: bool,
}

struct JobEntry {
    descriptor: JobDescriptor,
    stop: StopSignal,
    handle: JoinHandle<()>,
}

/// Active background jobs keyed by id
///
/// Ids start at 1 and grow by one per registration; a removed id is never
/// handed out again.
pub struct JobRegistry {
    next_id: u64,
    entries: BTreeMap<JobId, JobEntry>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Track a started job under a fresh id
    pub fn register(
        &mut self,
        handle: JoinHandle<()>,
        stop: StopSignal,
        descriptor: JobDescriptor,
    ) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        log::info!("job {} registered ({})", id, descriptor);
        self.entries.insert(
            id,
            JobEntry {
                descriptor,
                stop,
                handle,
            },
        );
        id
    }

    /// Registered jobs in ascending id order
    pub fn list(&self) -> Vec<JobInfo> {
        self.entries
            .iter()
            .map(|(id, entry)| JobInfo {
                id: *id,
                descriptor: entry.descriptor.clone(),
                finished: entry.handle.is_finished(),
            })
            .collect()
    }

    /// Ask job `id` to stop and forget it
    ///
    /// Returns as soon as the stop is requested; the job notices within one
    /// poll interval. Unknown or already removed ids give
    /// [`JobError::NotFound`] and leave every other entry untouched.
    pub fn stop(&mut self, id: JobId) -> JobResult<JobDescriptor> {
        let entry = self
            .entries
            .remove(&id)
            .ok_or(JobError::NotFound { id })?;
        entry.stop.request();
        log::info!("job {} asked to stop ({})", id, entry.descriptor);
        Ok(entry.descriptor)
    }

    /// Stop every registered job, returning the ids that were stopped
    pub fn stop_all(&mut self) -> Vec<JobId> {
        let entries = std::mem::take(&mut self.entries);
        entries
            .into_iter()
            .map(|(id, entry)| {
                entry.stop.request();
                id
            })
            .collect()
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
