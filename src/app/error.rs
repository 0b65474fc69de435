//! Console Error Types

use crate::app::cli::config::ConfigError;
use crate::broker::BrokerError;
use crate::core::error_handling::ContextualError;
use crate::jobs::JobError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("Cannot read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_actionable(),
            AppError::Broker(e) => e.is_user_actionable(),
            AppError::Job(e) => e.is_user_actionable(),
            AppError::ReadFile { .. } => true,
            AppError::Io(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Broker(e) => e.user_message(),
            AppError::Job(e) => e.user_message(),
            AppError::ReadFile { .. } => Some(self.to_string()),
            AppError::Io(_) => None,
        }
    }
}
