//! Facade - one explicit application context instead of process-wide singletons.

#[allow(clippy::module_inception)]
mod facade;
mod notifier;

pub use facade::Facade;
pub use notifier::Notifier;
