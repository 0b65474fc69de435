//! Console job management
//!
//! Consumption of a topic runs as a job: either in the foreground, blocking
//! the console until an interrupt stops it, or in the background next to the
//! console, tracked by id until the operator kills it.
//!
//! ```text
//!   Ctrl-C ──► interrupt listener ──► ForegroundControl ◄── foreground job
//!                                      (active / stop)
//!
//!   console ──► JobManager ──► JobRegistry ──► StopSignal ◄── background job 1
//!                                          └─► StopSignal ◄── background job 2
//! ```
//!
//! Cancellation is cooperative everywhere: jobs poll their stream with a
//! bounded wait and check their stop conditions in between, so a stop takes
//! effect within one poll interval.
//!
//! ```rust,no_run
//! use topicsh::broker::connect;
//! use topicsh::jobs::api::{ConsumeOutcome, ForegroundControl, JobManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let broker = connect("localhost:9092", &[])?;
//! let control = ForegroundControl::new();
//! let mut jobs = JobManager::new(broker, control);
//!
//! if let ConsumeOutcome::Background(id) = jobs.start_consume("orders", true).await? {
//!     for info in jobs.list_jobs() {
//!         println!("{}: {}", info.id, info.descriptor);
//!     }
//!     jobs.kill_job(id)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod consume;
mod control;
mod error;
mod interrupt;
mod manager;
mod output;
mod registry;

pub use consume::{
    render_payload, render_record, ConsumptionJob, JobDescriptor, JobMode, JobSummary,
    DEFAULT_POLL_INTERVAL,
};
pub use control::{ForegroundControl, ForegroundGuard, InterruptOutcome, StopSignal};
pub use error::{JobError, JobResult};
pub use interrupt::spawn_listener;
pub use manager::{ConsumeOutcome, JobManager, JobSettings, DEFAULT_GROUP_ID};
pub use output::{BufferedOutput, JobOutput, StdoutOutput};
pub use registry::{JobId, JobInfo, JobRegistry};

#[cfg(test)]
mod tests;
