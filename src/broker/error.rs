//! Broker Error Types

use crate::core::error_handling::ContextualError;

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("Invalid topic name '{topic}': {reason}")]
    InvalidTopic { topic: String, reason: String },

    #[error("Invalid bootstrap server list: {message}")]
    Bootstrap { message: String },

    #[error("Broker connection closed while using topic '{topic}'")]
    Disconnected { topic: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },
}

/// Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;

impl ContextualError for BrokerError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            BrokerError::InvalidTopic { .. } | BrokerError::Bootstrap { .. }
        )
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}
