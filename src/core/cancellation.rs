//! Hierarchical cancellation for blocking worker threads
//!
//! A [`CancellationToken`] is the external control that lets a thread
//! suspended inside [`BoundedChannel::put`](crate::channel::BoundedChannel::put),
//! [`BoundedChannel::get`](crate::channel::BoundedChannel::get) or
//! [`CancellationToken::sleep`] abandon the wait. Tokens form a tree:
//! cancelling a token cancels every token derived from it with
//! [`CancellationToken::child`], while cancelling a child leaves its parent
//! and siblings running.
//!
//! Blocking primitives register a [`Wake`] handle with the token they wait
//! on. Cancellation sets the flag first and then wakes every registered
//! handle, so a waiter either observes the flag before suspending or is
//! woken after it suspended.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, Weak};
use std::time::{Duration, Instant};

use crate::core::sync::recover_poison;

/// Something that parks threads and can be asked to re-check its predicates
pub(crate) trait Wake: Send + Sync {
    /// Wake every thread parked on this primitive
    fn wake_all(&self);
}

#[derive(Default)]
struct TokenState {
    cancelled: AtomicBool,
    children: Mutex<Vec<Weak<TokenState>>>,
    wakers: Mutex<Vec<Weak<dyn Wake>>>,
    sleep_lock: Mutex<()>,
    sleep_signal: Condvar,
}

impl TokenState {
    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        // Collect under the lock, wake outside it
        let wakers: Vec<Arc<dyn Wake>> = {
            let mut wakers = recover_poison(self.wakers.lock(), "cancellation wakers");
            let live = wakers.iter().filter_map(Weak::upgrade).collect();
            wakers.clear();
            live
        };
        for waker in wakers {
            waker.wake_all();
        }

        {
            let _guard = recover_poison(self.sleep_lock.lock(), "cancellation sleep");
            self.sleep_signal.notify_all();
        }

        let children: Vec<Arc<TokenState>> = {
            let mut children = recover_poison(self.children.lock(), "cancellation children");
            let live = children.iter().filter_map(Weak::upgrade).collect();
            children.clear();
            live
        };
        for child in children {
            child.cancel();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Cloneable handle used to interrupt blocked channel operations
///
/// Clones share the same state: cancelling any clone cancels them all.
///
/// # Example
///
/// ```rust
/// use signalrank::core::cancellation::CancellationToken;
///
/// let root = CancellationToken::new();
/// let worker = root.child();
///
/// worker.cancel();
/// assert!(worker.is_cancelled());
/// assert!(!root.is_cancelled());
///
/// let other = root.child();
/// root.cancel();
/// assert!(other.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenState>,
}

impl CancellationToken {
    /// Create a new, uncancelled root token
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a token that is cancelled whenever this one is
    pub fn child(&self) -> Self {
        let child = Self::new();
        {
            let mut children = recover_poison(self.inner.children.lock(), "cancellation children");
            children.retain(|c| c.strong_count() > 0);
            children.push(Arc::downgrade(&child.inner));
        }
        // The parent may have been cancelled between creation and registration
        if self.is_cancelled() {
            child.cancel();
        }
        child
    }

    /// Request cancellation and wake every thread waiting on this token
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Sleep for `duration` unless cancelled first
    ///
    /// Returns `true` when the sleep was cut short by cancellation.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = recover_poison(self.inner.sleep_lock.lock(), "cancellation sleep");
        loop {
            if self.is_cancelled() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next, _) = recover_poison(
                self.inner.sleep_signal.wait_timeout(guard, deadline - now),
                "cancellation sleep",
            );
            guard = next;
        }
    }

    /// Register a primitive to be woken when this token is cancelled
    pub(crate) fn register(&self, waker: Weak<dyn Wake>) {
        let mut wakers = recover_poison(self.inner.wakers.lock(), "cancellation wakers");
        if wakers.iter().any(|w| Weak::ptr_eq(w, &waker)) {
            return;
        }
        wakers.retain(|w| w.strong_count() > 0);
        wakers.push(waker);
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    struct CountingWaker {
        wakes: AtomicUsize,
    }

    impl Wake for CountingWaker {
        fn wake_all(&self) {
            self.wakes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_new_token_is_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
    }

    #[test]
    fn test_parent_cancels_children_transitively() {
        let root = CancellationToken::new();
        let child = root.child();
        let grandchild = child.child();

        root.cancel();

        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_propagate_upwards() {
        let root = CancellationToken::new();
        let first = root.child();
        let second = root.child();

        first.cancel();

        assert!(first.is_cancelled());
        assert!(!root.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_child_of_cancelled_parent_starts_cancelled() {
        let root = CancellationToken::new();
        root.cancel();

        assert!(root.child().is_cancelled());
    }

    #[test]
    fn test_registered_waker_fires_once() {
        let token = CancellationToken::new();
        let waker = Arc::new(CountingWaker {
            wakes: AtomicUsize::new(0),
        });
        let weak: Weak<dyn Wake> = Arc::downgrade(&waker) as Weak<dyn Wake>;

        token.register(weak.clone());
        token.register(weak);
        token.cancel();
        token.cancel();

        assert_eq!(waker.wakes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sleep_runs_to_completion_without_cancel() {
        let token = CancellationToken::new();
        let start = Instant::now();

        let interrupted = token.sleep(Duration::from_millis(20));

        assert!(!interrupted);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_sleep_is_interrupted_by_parent_cancel() {
        let root = CancellationToken::new();
        let child = root.child();

        let sleeper = thread::spawn(move || {
            let start = Instant::now();
            let interrupted = child.sleep(Duration::from_secs(30));
            (interrupted, start.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        root.cancel();

        let (interrupted, elapsed) = sleeper.join().unwrap();
        assert!(interrupted);
        assert!(elapsed < Duration::from_secs(5), "sleep took {:?}", elapsed);
    }
}
