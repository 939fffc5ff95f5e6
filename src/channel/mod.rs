//! Bounded Handoff Channel
//!
//! The single synchronization point between signal producers and consumers.
//! A fixed-capacity FIFO buffer whose `put` blocks while full and whose `get`
//! blocks while empty, so producers can never run more than `capacity`
//! signals ahead of the consumers.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ ┌────────────┐       ┌────────────┐
//! │ Producer 1 │ │ Producer 2 │  ...  │ Producer N │
//! └─────┬──────┘ └─────┬──────┘       └─────┬──────┘
//!       │ put (blocks when full)            │
//!       ▼              ▼                    ▼
//! ┌──────────────────────────────────────────────────┐
//! │          BoundedChannel (capacity C)             │
//! │   head ┌───┬───┬───┬───┬───┐ tail               │
//! │        │ 1 │ 2 │ 3 │...│ k │   k ≤ C            │
//! │        └───┴───┴───┴───┴───┘                    │
//! └──────────────────────┬───────────────────────────┘
//!       get (blocks when empty)
//!       ┌────────────────┴───────────────┐
//!       ▼                                ▼
//! ┌────────────┐                   ┌────────────┐
//! │ Consumer 1 │       ...         │ Consumer M │
//! └────────────┘                   └────────────┘
//! ```
//!
//! Items leave in exactly the order they entered, across all producers.
//! Each blocking call takes a [`CancellationToken`](crate::core::cancellation::CancellationToken);
//! cancelling it makes the call return [`ChannelError::Cancelled`] promptly.

pub mod api;
mod bounded;
mod error;

pub use bounded::BoundedChannel;
pub use error::{ChannelError, ChannelResult};

#[cfg(test)]
mod tests;
