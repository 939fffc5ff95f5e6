//! Synchronization utilities for robust lock handling
//!
//! The shared structures in this crate keep their state valid between
//! statements, so a panic in one worker while it held a lock leaves nothing
//! half-written. Rather than turning poison into an error on every call,
//! the guard is recovered and the event is logged once per occurrence.

use std::sync::{LockResult, PoisonError};

/// Recover the guard from a possibly poisoned lock result
///
/// # Arguments
/// * `result` - The result from a `lock()`, `wait()` or `wait_timeout()` call
/// * `context` - Short description of the protected resource, used in the log
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use signalrank::core::sync::recover_poison;
///
/// let mutex = Mutex::new(42);
/// let guard = recover_poison(mutex.lock(), "answer");
/// assert_eq!(*guard, 42);
/// ```
pub fn recover_poison<G>(result: LockResult<G>, context: &str) -> G {
    result.unwrap_or_else(|poison_err: PoisonError<G>| {
        log::warn!(
            "Recovered poisoned lock on {}: a worker panicked while holding it",
            context
        );
        poison_err.into_inner()
    })
}
