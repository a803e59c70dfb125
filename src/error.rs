//! Error type shared by the bus, the registries and the facade.
//!
//! Lookups on absent names are not errors: they come back as `bool` or
//! `Option`. The only caller-facing hard failure is a missing name.

use thiserror::Error;

/// Errors produced by the dispatch engine.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MvcError {
    /// A message, command, proxy or mediator name was empty.
    #[error("empty name passed to {operation}")]
    EmptyName {
        /// The operation that rejected the name.
        operation: &'static str,
    },

    /// `unsubscribe` was called for a name that has no subscriber list.
    #[error("no subscribers registered for notification {0:?}")]
    NotSubscribed(String),

    /// A registry lock was poisoned by a panicking thread.
    #[error("registry lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// A `Notifier` outlived the facade it was issued by.
    #[error("notifier used after its facade was dropped")]
    FacadeDropped,
}

impl MvcError {
    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            MvcError::EmptyName { .. } => "empty_name",
            MvcError::NotSubscribed(_) => "not_subscribed",
            MvcError::LockPoisoned(_) => "lock_poisoned",
            MvcError::FacadeDropped => "facade_dropped",
        }
    }
}

/// Reject an empty name for `operation`.
pub(crate) fn require_name(name: &str, operation: &'static str) -> Result<(), MvcError> {
    if name.is_empty() {
        Err(MvcError::EmptyName { operation })
    } else {
        Ok(())
    }
}
