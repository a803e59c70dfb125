//! Notifier - lets stored objects send notifications without owning the facade.

use std::fmt;
use std::sync::Weak;

use serde_json::Value;

use super::facade::{Facade, FacadeInner};
use crate::error::MvcError;

/// Weak handle to a [`Facade`].
///
/// Proxies, mediators and commands keep a `Notifier` to send notifications
/// or reach the registries. A default `Notifier` is detached and fails with
/// `MvcError::FacadeDropped`.
#[derive(Clone, Default)]
pub struct Notifier {
    facade: Weak<FacadeInner>,
}

impl Notifier {
    pub(super) fn new(facade: Weak<FacadeInner>) -> Self {
        Self { facade }
    }

    /// A notifier not bound to any facade.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether the facade is still alive.
    pub fn is_attached(&self) -> bool {
        self.facade.strong_count() > 0
    }

    /// Upgrade to the facade.
    pub fn facade(&self) -> Result<Facade, MvcError> {
        self.facade
            .upgrade()
            .map(Facade::from_inner)
            .ok_or(MvcError::FacadeDropped)
    }

    /// Same as [`Facade::send_notification`].
    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Value>,
        kind: Option<&str>,
    ) -> Result<usize, MvcError> {
        self.facade()?.send_notification(name, body, kind)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("attached", &self.is_attached())
            .finish()
    }
}
