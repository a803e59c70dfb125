//! Recording subscribers shared by the dispatch tests.

use std::sync::{Arc, Mutex};

use relay_mvc::{Message, SubscriberId, Subscription};

/// Ordered log of `tag:name` entries written by subscribers.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// A subscription that records `tag:<message name>`.
    pub fn subscriber(&self, tag: &str) -> (SubscriberId, Subscription) {
        let id = SubscriberId::next();
        let journal = self.clone();
        let tag = tag.to_string();
        let subscription = Subscription::new(id, move |message: &Message| {
            journal.push(format!("{}:{}", tag, message.name));
        });
        (id, subscription)
    }
}
