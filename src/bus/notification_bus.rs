//! NotificationBus - named subscriber lists and synchronous fan-out.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, trace};

use super::subscription::{SubscriberId, Subscription};
use crate::error::{require_name, MvcError};
use crate::message::Message;

/// Maps a notification name to its ordered list of subscriptions.
///
/// Insertion order is dispatch order. A name disappears from the map as
/// soon as its last subscription is removed.
///
/// ## Example
///
/// ```ignore
/// let bus = NotificationBus::new();
/// let id = SubscriberId::next();
/// bus.subscribe("PING", Subscription::new(id, |m| println!("{}", m.name)))?;
///
/// bus.dispatch(&Message::new("PING"))?;
/// bus.unsubscribe("PING", id)?;
/// ```
#[derive(Default)]
pub struct NotificationBus {
    observers: RwLock<HashMap<String, Vec<Subscription>>>,
}

impl NotificationBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `subscription` to the list for `name`.
    ///
    /// No de-duplication: the same id may appear several times under one name.
    pub fn subscribe(&self, name: &str, subscription: Subscription) -> Result<(), MvcError> {
        require_name(name, "subscribe")?;
        let mut observers = self
            .observers
            .write()
            .map_err(|_| MvcError::LockPoisoned("subscribe"))?;
        debug!(name, id = %subscription.id(), "subscription added");
        observers
            .entry(name.to_string())
            .or_default()
            .push(subscription);
        Ok(())
    }

    /// Remove the first subscription for `name` owned by `id`.
    ///
    /// Returns `Ok(false)` when the list exists but `id` is not in it, and
    /// `MvcError::NotSubscribed` when `name` has no list at all.
    pub fn unsubscribe(&self, name: &str, id: SubscriberId) -> Result<bool, MvcError> {
        require_name(name, "unsubscribe")?;
        let mut observers = self
            .observers
            .write()
            .map_err(|_| MvcError::LockPoisoned("unsubscribe"))?;

        let list = observers
            .get_mut(name)
            .ok_or_else(|| MvcError::NotSubscribed(name.to_string()))?;

        let removed = list
            .iter()
            .position(|subscription| subscription.is_for(id))
            .map(|index| list.remove(index));

        if list.is_empty() {
            observers.remove(name);
        }
        drop(observers);

        // The callback may own the last reference to its receiver; release it
        // outside the lock.
        let found = removed.is_some();
        drop(removed);

        if found {
            debug!(name, %id, "subscription removed");
        }
        Ok(found)
    }

    /// Deliver `message` to every subscriber of `message.name`, in order.
    ///
    /// The list is snapshotted first: subscriptions added or removed by a
    /// handler apply from the next dispatch on. Handlers run on the caller's
    /// thread with no lock held, so they may send, subscribe or unsubscribe.
    /// Returns the number of subscriptions invoked.
    pub fn dispatch(&self, message: &Message) -> Result<usize, MvcError> {
        let snapshot = {
            let observers = self
                .observers
                .read()
                .map_err(|_| MvcError::LockPoisoned("dispatch"))?;
            match observers.get(&message.name) {
                Some(list) => list.clone(),
                None => {
                    trace!(notification = %message.name, "no subscribers");
                    return Ok(0);
                }
            }
        };

        trace!(notification = %message.name, subscribers = snapshot.len(), "dispatching");
        for subscription in &snapshot {
            subscription.notify(message);
        }
        Ok(snapshot.len())
    }

    /// Remove the subscription of a registry-owned receiver.
    ///
    /// Registries only call this for names they subscribed themselves, so a
    /// missing list means the bus was cleared underneath them; that is not an
    /// error for the registry.
    pub(crate) fn release(&self, name: &str, id: SubscriberId) -> Result<(), MvcError> {
        match self.unsubscribe(name, id) {
            Ok(_) | Err(MvcError::NotSubscribed(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Whether `name` has at least one subscription.
    pub fn has_subscribers(&self, name: &str) -> bool {
        self.subscriber_count(name) > 0
    }

    /// Number of subscriptions registered for `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.observers
            .read()
            .map(|observers| observers.get(name).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Names that currently have subscribers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .observers
            .read()
            .map(|observers| observers.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Drop every subscriber list.
    pub fn clear(&self) -> Result<(), MvcError> {
        let drained = {
            let mut observers = self
                .observers
                .write()
                .map_err(|_| MvcError::LockPoisoned("clear"))?;
            std::mem::take(&mut *observers)
        };
        debug!(names = drained.len(), "bus cleared");
        drop(drained);
        Ok(())
    }

    /// Poison the subscriber map, as a panic inside `subscribe` would.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.observers.write();
                    panic!("poisoning notification bus");
                })
                .join();
        });
    }
}
