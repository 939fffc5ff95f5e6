//! Channel Error Types

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The waiting operation was abandoned because its token was cancelled
    #[error("Channel operation cancelled")]
    Cancelled,
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;
