//! Job Error Types

use super::JobId;
use crate::broker::BrokerError;
use crate::core::error_handling::ContextualError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("A foreground job is already running")]
    ForegroundBusy,

    #[error("job not exist: {id}")]
    NotFound { id: JobId },

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Result type for job operations
pub type JobResult<T> = Result<T, JobError>;

impl ContextualError for JobError {
    fn is_user_actionable(&self) -> bool {
        match self {
            JobError::ForegroundBusy | JobError::NotFound { .. } => true,
            JobError::Broker(e) => e.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            JobError::ForegroundBusy | JobError::NotFound { .. } => Some(self.to_string()),
            JobError::Broker(e) => e.user_message(),
        }
    }
}
