//! Fixed-capacity FIFO with blocking, cancellable put/get
//!
//! All state lives behind a single mutex. Every mutation broadcasts on one
//! condition variable and every waiter re-checks its own predicate, so no
//! ordering between woken threads is promised beyond "eventually, once the
//! predicate holds".

use crate::channel::error::{ChannelError, ChannelResult};
use crate::core::cancellation::{CancellationToken, Wake};
use crate::core::error::{ConfigError, ConfigResult};
use crate::core::sync::recover_poison;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};

#[derive(Debug)]
struct Shared<T> {
    items: Mutex<VecDeque<T>>,
    changed: Condvar,
    capacity: usize,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        recover_poison(self.items.lock(), "channel buffer")
    }
}

impl<T: Send> Wake for Shared<T> {
    fn wake_all(&self) {
        // Taking the lock orders this wake after any in-flight predicate check
        let _items = self.lock();
        self.changed.notify_all();
    }
}

/// Bounded multi-producer multi-consumer handoff queue
///
/// Cloning the channel yields another handle to the same buffer.
///
/// # Example
///
/// ```rust
/// use signalrank::channel::api::{BoundedChannel, CancellationToken};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let channel = BoundedChannel::new(2)?;
/// let token = CancellationToken::new();
///
/// channel.put("first", &token)?;
/// channel.put("second", &token)?;
/// assert!(channel.is_full());
///
/// assert_eq!(channel.get(&token)?, "first");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BoundedChannel<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for BoundedChannel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> BoundedChannel<T> {
    /// Create a channel holding at most `capacity` items
    pub fn new(capacity: usize) -> ConfigResult<Self> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity { capacity: 0 });
        }

        Ok(Self {
            shared: Arc::new(Shared {
                items: Mutex::new(VecDeque::with_capacity(capacity)),
                changed: Condvar::new(),
                capacity,
            }),
        })
    }

    /// Append `item` at the tail, blocking while the channel is full
    ///
    /// Returns [`ChannelError::Cancelled`] if `token` is cancelled before
    /// room becomes available; the item is dropped and the buffer untouched.
    pub fn put(&self, item: T, token: &CancellationToken) -> ChannelResult<()> {
        self.attach(token);

        let mut items = self.shared.lock();
        loop {
            if token.is_cancelled() {
                return Err(ChannelError::Cancelled);
            }
            if items.len() < self.shared.capacity {
                break;
            }
            log::trace!("put waiting: channel full ({} items)", items.len());
            items = recover_poison(self.shared.changed.wait(items), "channel buffer");
        }

        items.push_back(item);
        drop(items);
        self.shared.changed.notify_all();
        Ok(())
    }

    /// Remove and return the head item, blocking while the channel is empty
    pub fn get(&self, token: &CancellationToken) -> ChannelResult<T> {
        self.attach(token);

        let mut items = self.shared.lock();
        let item = loop {
            if token.is_cancelled() {
                return Err(ChannelError::Cancelled);
            }
            if let Some(item) = items.pop_front() {
                break item;
            }
            log::trace!("get waiting: channel empty");
            items = recover_poison(self.shared.changed.wait(items), "channel buffer");
        };

        drop(items);
        self.shared.changed.notify_all();
        Ok(item)
    }

    /// Append without blocking, handing the item back when the channel is full
    pub fn try_put(&self, item: T) -> Result<(), T> {
        let mut items = self.shared.lock();
        if items.len() >= self.shared.capacity {
            return Err(item);
        }
        items.push_back(item);
        drop(items);
        self.shared.changed.notify_all();
        Ok(())
    }

    /// Remove the head item without blocking
    pub fn try_get(&self) -> Option<T> {
        let item = self.shared.lock().pop_front()?;
        self.shared.changed.notify_all();
        Some(item)
    }

    fn attach(&self, token: &CancellationToken) {
        let waker: Weak<dyn Wake> = Arc::downgrade(&self.shared) as Weak<dyn Wake>;
        token.register(waker);
    }
}

impl<T> BoundedChannel<T> {
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Number of buffered items at the instant of the call
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.shared.lock().len() >= self.shared.capacity
    }
}
