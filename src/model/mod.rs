//! Model - named data holders (proxies) and their registry.

mod proxy;
mod registry;

pub use proxy::{DataProxy, Proxy};
pub use registry::ComponentRegistry;
