//! Public API for console job management
//!
//! External modules should import from here rather than from the individual
//! job modules.

pub use crate::jobs::consume::{
    render_payload, render_record, ConsumptionJob, JobDescriptor, JobMode, JobSummary,
    DEFAULT_POLL_INTERVAL,
};
pub use crate::jobs::control::{ForegroundControl, ForegroundGuard, InterruptOutcome, StopSignal};
pub use crate::jobs::error::{JobError, JobResult};
pub use crate::jobs::interrupt::spawn_listener;
pub use crate::jobs::manager::{ConsumeOutcome, JobManager, JobSettings, DEFAULT_GROUP_ID};
pub use crate::jobs::output::{BufferedOutput, JobOutput, StdoutOutput};
pub use crate::jobs::registry::{JobId, JobInfo, JobRegistry};
