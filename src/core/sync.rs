//! Helpers for mapping lock poisoning onto domain errors.

use std::sync::LockResult;

/// Convert a poisoned lock result into an application error
///
/// Works for `Mutex::lock`, `RwLock::read` and `RwLock::write` alike since all
/// of them return a `LockResult` of their guard type.
///
/// ```
/// use std::sync::Mutex;
/// use topicsh::core::sync::handle_mutex_poison;
/// use topicsh::broker::BrokerError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| BrokerError::OperationFailed { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (lock poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
