//! Subscription handles: a callback plus the identity of its receiver.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::message::Message;

static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a receiver.
///
/// Removal from the bus compares ids, never callbacks, so several
/// subscriptions wrapping different closures can share one receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}

/// Shared notification callback.
pub type Callback = Arc<dyn Fn(&Message) + Send + Sync>;

/// A registered `(callback, identity)` pair.
///
/// Cloning is cheap; clones share the callback.
#[derive(Clone)]
pub struct Subscription {
    id: SubscriberId,
    callback: Callback,
}

impl Subscription {
    /// Wrap a closure for the receiver identified by `id`.
    pub fn new<F>(id: SubscriberId, callback: F) -> Self
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        Self::from_callback(id, Arc::new(callback))
    }

    /// Wrap an already shared callback.
    pub fn from_callback(id: SubscriberId, callback: Callback) -> Self {
        Self { id, callback }
    }

    /// Identity of the receiver.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether this subscription belongs to `id`.
    pub fn is_for(&self, id: SubscriberId) -> bool {
        self.id == id
    }

    /// Invoke the callback.
    pub fn notify(&self, message: &Message) {
        (self.callback)(message)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
