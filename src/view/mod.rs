//! View - mediators and the registry that subscribes them on the bus.

mod mediator;
mod registry;

pub use mediator::Mediator;
pub use registry::AdapterRegistry;
