//! Proxies - named data holders.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::MvcError;

/// A named data holder stored in the `ComponentRegistry`.
///
/// The registry calls `on_register` once the proxy is installed and
/// `on_remove` when it is evicted, removed or the registry is reset.
pub trait Proxy: Any + Send + Sync {
    /// Registry key.
    fn proxy_name(&self) -> &str;

    /// Called after the proxy has been installed.
    fn on_register(&self) {}

    /// Called after the proxy has been taken out of the registry.
    fn on_remove(&self) {}
}

/// Ready-made proxy holding an optional JSON value.
pub struct DataProxy {
    name: String,
    data: RwLock<Option<Value>>,
    registered: AtomicBool,
}

impl DataProxy {
    /// Name used by `DataProxy::default()`.
    pub const DEFAULT_NAME: &'static str = "Proxy";

    /// Create a proxy with no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: RwLock::new(None),
            registered: AtomicBool::new(false),
        }
    }

    /// Create a proxy holding `data`.
    pub fn with_data(name: impl Into<String>, data: Value) -> Self {
        Self {
            data: RwLock::new(Some(data)),
            ..Self::new(name)
        }
    }

    /// Current data.
    pub fn data(&self) -> Option<Value> {
        self.data.read().ok().and_then(|data| data.clone())
    }

    /// Decode the data into a typed value. Missing data decodes as `null`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data().unwrap_or(Value::Null))
    }

    /// Replace the data, returning the previous value.
    pub fn set_data(&self, data: Value) -> Result<Option<Value>, MvcError> {
        let mut slot = self
            .data
            .write()
            .map_err(|_| MvcError::LockPoisoned("set_data"))?;
        Ok(slot.replace(data))
    }

    /// Whether the proxy currently sits in a registry.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }
}

impl Default for DataProxy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl Proxy for DataProxy {
    fn proxy_name(&self) -> &str {
        &self.name
    }

    fn on_register(&self) {
        self.registered.store(true, Ordering::SeqCst);
    }

    fn on_remove(&self) {
        self.registered.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for DataProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProxy")
            .field("name", &self.name)
            .field("data", &self.data())
            .field("registered", &self.is_registered())
            .finish()
    }
}
