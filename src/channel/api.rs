//! Public API for the channel
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::channel::bounded::BoundedChannel;
pub use crate::channel::error::{ChannelError, ChannelResult};
pub use crate::core::cancellation::CancellationToken;
