//! Generic error handling utilities
//!
//! Lets the console report failures from any module the same way: a short
//! operator-facing line, with the full error kept at debug level.

/// Errors that can tell operator mistakes apart from system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with something the operator can act on. When it returns
/// `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// True when the error carries a message the operator can act on
    /// (bad topic name, unreadable config file, unknown job id)
    fn is_user_actionable(&self) -> bool;

    /// The operator-facing message for user-actionable errors
    fn user_message(&self) -> Option<String>;
}

/// Log an error with a detail level matched to what the operator can do about it
///
/// User-actionable errors show their own message; everything else shows the
/// operation context. The full error is always available at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("{}: {}", operation_context, user_msg);
        }
        _ => {
            log::error!("{} failed", operation_context);
        }
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Operator-facing one-liner for an error, used by the console before it re-prompts
pub fn describe<E: ContextualError + std::fmt::Display>(error: &E) -> String {
    match error.user_message() {
        Some(message) if error.is_user_actionable() => message,
        _ => error.to_string(),
    }
}
