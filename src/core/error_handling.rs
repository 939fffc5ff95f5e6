//! Generic error handling utilities
//!
//! Provides the fatal-error reporting used at startup so configuration
//! mistakes print a precise message while system failures print the
//! operation context and keep the details at debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    ///
    /// Examples: zero channel capacity, negative worker count, malformed TOML.
    /// Counter-examples: unreadable configuration file, logger backend failure.
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use signalrank::core::error_handling::log_error_with_context;
/// # use signalrank::core::error::ConfigError;
/// let err = ConfigError::InvalidCapacity { capacity: 0 };
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: Channel capacity must be at least 1 (got 0)"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
