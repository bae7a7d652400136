//! Network reachability as an external-store subscription.
//!
//! [`ReachabilitySignal`] is the seam: a synchronous `snapshot()` plus
//! `on_change(listener)`. [`ConnectivityMonitor`] is the event-driven
//! implementation the host environment feeds with "became reachable" /
//! "became unreachable" notifications. [`Headless`] answers for contexts
//! with no network primitives at all.
//!
//! There is no polling anywhere in this module. If the environment never
//! reports a transition, the monitor keeps its initial value.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use crate::obs::emit_connectivity_changed;

/// Callback invoked with the new reachability value.
pub type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Synchronously readable, subscribable reachability flag.
pub trait ReachabilitySignal: Send + Sync {
    /// Current reachability. Always answerable.
    fn snapshot(&self) -> bool;

    /// Register `listener` for transitions. Dropping the returned
    /// [`Subscription`] detaches it.
    fn on_change(&self, listener: Listener) -> Subscription;
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle that detaches a listener when dropped.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to detach.
    pub fn noop() -> Self {
        Self { detach: None }
    }

    /// Detach the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

// ============================================================================
// ConnectivityMonitor
// ============================================================================

/// Event-driven reachability monitor.
///
/// Cheap to clone (Arc internals). Listeners run only on actual transitions,
/// outside the monitor's internal lock, so a listener may read the monitor.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    tx: watch::Sender<bool>,
    listeners: Mutex<BTreeMap<u64, Listener>>,
    next_id: AtomicU64,
}

impl ConnectivityMonitor {
    /// Create a monitor with the environment's current reachability.
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self {
            inner: Arc::new(MonitorInner {
                tx,
                listeners: Mutex::new(BTreeMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn currently_online(&self) -> bool {
        *self.inner.tx.borrow()
    }

    /// Register a listener; see [`ReachabilitySignal::on_change`].
    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        self.on_change(Arc::new(listener))
    }

    /// Async view of the same signal.
    pub fn watch(&self) -> watch::Receiver<bool> {
        self.inner.tx.subscribe()
    }

    /// Environment notification: the network became reachable.
    pub fn became_reachable(&self) {
        self.set(true);
    }

    /// Environment notification: the network became unreachable.
    pub fn became_unreachable(&self) {
        self.set(false);
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock_listeners().len()
    }

    fn set(&self, online: bool) {
        let changed = self.inner.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if !changed {
            return;
        }

        emit_connectivity_changed(online);
        let listeners: Vec<Listener> = self.inner.lock_listeners().values().cloned().collect();
        for listener in listeners {
            listener(online);
        }
    }
}

impl MonitorInner {
    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConnectivityMonitor {
    /// Starts online, matching the conservative default.
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReachabilitySignal for ConnectivityMonitor {
    fn snapshot(&self) -> bool {
        self.currently_online()
    }

    fn on_change(&self, listener: Listener) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.lock_listeners().insert(id, listener);

        let weak: Weak<MonitorInner> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock_listeners().remove(&id);
            }
        })
    }
}

impl fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("online", &self.currently_online())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// ============================================================================
// Headless
// ============================================================================

/// Signal for contexts without network primitives (pre-rendering, headless
/// runs): always online, never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl ReachabilitySignal for Headless {
    fn snapshot(&self) -> bool {
        true
    }

    fn on_change(&self, _listener: Listener) -> Subscription {
        Subscription::noop()
    }
}
