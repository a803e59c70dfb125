//! AdapterRegistry - the mediator store, wired into the bus.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::mediator::Mediator;
use crate::bus::{NotificationBus, SubscriberId, Subscription};
use crate::error::{require_name, MvcError};

/// Stored mediator plus what registration captured.
struct MediatorEntry {
    id: SubscriberId,
    interests: Vec<String>,
    live: Arc<AtomicBool>,
    mediator: Arc<dyn Mediator>,
    any: Arc<dyn Any + Send + Sync>,
}

/// Named mediator store with reject-on-duplicate semantics.
///
/// Each registered mediator owns one subscription, shared across all of
/// its interests. The subscription only holds a weak reference, so the
/// registry is the sole owner of the mediator. Once a mediator is removed
/// it receives nothing more, even from a dispatch already in progress.
pub struct AdapterRegistry {
    bus: Arc<NotificationBus>,
    mediators: RwLock<HashMap<String, MediatorEntry>>,
}

impl AdapterRegistry {
    /// Create a registry that subscribes mediators on `bus`.
    pub fn new(bus: Arc<NotificationBus>) -> Self {
        Self {
            bus,
            mediators: RwLock::new(HashMap::new()),
        }
    }

    /// Install `mediator` and subscribe it for every interest.
    ///
    /// Returns `Ok(false)` without touching anything when the name is
    /// already taken; remove the existing mediator first to replace it.
    pub fn register_mediator<M: Mediator>(&self, mediator: Arc<M>) -> Result<bool, MvcError> {
        let name = mediator.mediator_name().to_string();
        require_name(&name, "register_mediator")?;

        let interests = mediator.notification_interests();
        for interest in &interests {
            require_name(interest, "register_mediator")?;
        }

        {
            let mut mediators = self
                .mediators
                .write()
                .map_err(|_| MvcError::LockPoisoned("register_mediator"))?;

            if mediators.contains_key(&name) {
                debug!(name = %name, "mediator already registered, ignoring");
                return Ok(false);
            }

            let id = SubscriberId::next();
            let live = Arc::new(AtomicBool::new(true));
            if !interests.is_empty() {
                let subscription = handler_subscription(id, &live, &mediator);
                for (subscribed, interest) in interests.iter().enumerate() {
                    if let Err(err) = self.bus.subscribe(interest, subscription.clone()) {
                        live.store(false, Ordering::SeqCst);
                        for interest in &interests[..subscribed] {
                            let _ = self.bus.release(interest, id);
                        }
                        return Err(err);
                    }
                }
            }

            debug!(name = %name, %id, ?interests, "mediator registered");
            mediators.insert(
                name,
                MediatorEntry {
                    id,
                    interests,
                    live,
                    mediator: mediator.clone(),
                    any: mediator.clone(),
                },
            );
        }

        mediator.on_register();
        Ok(true)
    }

    /// Typed lookup. `None` if absent or registered under another type.
    pub fn retrieve_mediator<M: Mediator>(&self, name: &str) -> Option<Arc<M>> {
        let any = self.with_entry(name, |entry| Arc::clone(&entry.any))?;
        any.downcast::<M>().ok()
    }

    /// Untyped lookup.
    pub fn retrieve_mediator_dyn(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.with_entry(name, |entry| Arc::clone(&entry.mediator))
    }

    /// Whether a mediator is registered under `name`.
    pub fn has_mediator(&self, name: &str) -> bool {
        self.with_entry(name, |_| ()).is_some()
    }

    /// The interests captured when `name` was registered.
    pub fn mediator_interests(&self, name: &str) -> Option<Vec<String>> {
        self.with_entry(name, |entry| entry.interests.clone())
    }

    /// Unsubscribe every captured interest, remove the mediator and run its
    /// `on_remove`. Absent names are a no-op (`Ok(None)`).
    pub fn remove_mediator(&self, name: &str) -> Result<Option<Arc<dyn Mediator>>, MvcError> {
        let removed = {
            let mut mediators = self
                .mediators
                .write()
                .map_err(|_| MvcError::LockPoisoned("remove_mediator"))?;

            let Some(entry) = mediators.get(name) else {
                return Ok(None);
            };
            entry.live.store(false, Ordering::SeqCst);
            for interest in &entry.interests {
                self.bus.release(interest, entry.id)?;
            }
            mediators.remove(name)
        };

        Ok(removed.map(|entry| {
            debug!(name, id = %entry.id, "mediator removed");
            entry.mediator.on_remove();
            entry.mediator
        }))
    }

    /// Registered mediator names, sorted.
    pub fn mediator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.mediators.read() {
            Ok(mediators) => mediators.keys().cloned().collect(),
            Err(_) => {
                warn!("mediator registry lock poisoned");
                Vec::new()
            }
        };
        names.sort();
        names
    }

    /// Remove every mediator with its subscriptions, running each `on_remove`.
    pub fn reset(&self) -> Result<(), MvcError> {
        let drained = {
            let mut mediators = self
                .mediators
                .write()
                .map_err(|_| MvcError::LockPoisoned("reset mediators"))?;
            std::mem::take(&mut *mediators)
        };

        for entry in drained.values() {
            entry.live.store(false, Ordering::SeqCst);
            for interest in &entry.interests {
                self.bus.release(interest, entry.id)?;
            }
        }

        debug!(mediators = drained.len(), "mediator registry reset");
        for entry in drained.into_values() {
            entry.mediator.on_remove();
        }
        Ok(())
    }

    fn with_entry<T>(&self, name: &str, f: impl FnOnce(&MediatorEntry) -> T) -> Option<T> {
        match self.mediators.read() {
            Ok(mediators) => mediators.get(name).map(f),
            Err(_) => {
                warn!(name, "mediator registry lock poisoned");
                None
            }
        }
    }
}

/// One subscription per mediator, routed to `handle_notification` while
/// `live` is set.
fn handler_subscription<M: Mediator>(
    id: SubscriberId,
    live: &Arc<AtomicBool>,
    mediator: &Arc<M>,
) -> Subscription {
    let live = Arc::clone(live);
    let mediator = Arc::downgrade(mediator);
    Subscription::new(id, move |message| {
        if !live.load(Ordering::SeqCst) {
            return;
        }
        if let Some(mediator) = mediator.upgrade() {
            mediator.handle_notification(message);
        }
    })
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("mediators", &self.mediator_names())
            .finish()
    }
}
