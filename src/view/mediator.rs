//! Mediators - named receivers with a fixed set of notification interests.

use std::any::Any;

use crate::message::Message;

/// A named adapter that reacts to the notifications it declares interest in.
///
/// `notification_interests` is queried exactly once, when the mediator is
/// registered. Returning a different list later has no effect.
pub trait Mediator: Any + Send + Sync {
    /// Registry key.
    fn mediator_name(&self) -> &str;

    /// Names this mediator wants to receive.
    fn notification_interests(&self) -> Vec<String> {
        Vec::new()
    }

    /// Called once per dispatched message whose name is an interest.
    fn handle_notification(&self, _message: &Message) {}

    /// Called after the mediator has been installed and subscribed.
    fn on_register(&self) {}

    /// Called after the mediator has been unsubscribed and removed.
    fn on_remove(&self) {}
}
