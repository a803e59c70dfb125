//! ComponentRegistry - the proxy store.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::proxy::Proxy;
use crate::error::{require_name, MvcError};

/// Stored representation of a proxy: one allocation, viewed both as the
/// trait object and as `Any` for typed retrieval.
struct ProxyEntry {
    proxy: Arc<dyn Proxy>,
    any: Arc<dyn Any + Send + Sync>,
}

/// Named proxy store with overwrite semantics.
///
/// Registering a name that is already taken evicts the old proxy (its
/// `on_remove` runs) before the new one is installed.
#[derive(Default)]
pub struct ComponentRegistry {
    proxies: RwLock<HashMap<String, ProxyEntry>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `proxy` under its name, evicting any previous holder.
    ///
    /// The previous holder is taken out and its `on_remove` has run before
    /// the new proxy goes in.
    pub fn register_proxy<P: Proxy>(&self, proxy: Arc<P>) -> Result<(), MvcError> {
        let name = proxy.proxy_name().to_string();
        require_name(&name, "register_proxy")?;

        if self.remove_proxy(&name)?.is_some() {
            debug!(name = %name, "proxy evicted");
        }

        let entry = ProxyEntry {
            any: proxy.clone(),
            proxy: proxy.clone(),
        };
        let raced = {
            let mut proxies = self
                .proxies
                .write()
                .map_err(|_| MvcError::LockPoisoned("register_proxy"))?;
            proxies.insert(name.clone(), entry)
        };

        // Another thread registered the same name in between.
        if let Some(raced) = raced {
            raced.proxy.on_remove();
        }
        debug!(name = %name, "proxy registered");
        proxy.on_register();
        Ok(())
    }

    /// Typed lookup. `None` if absent or registered under another type.
    pub fn retrieve_proxy<P: Proxy>(&self, name: &str) -> Option<Arc<P>> {
        let any = self.with_entry(name, |entry| Arc::clone(&entry.any))?;
        any.downcast::<P>().ok()
    }

    /// Untyped lookup.
    pub fn retrieve_proxy_dyn(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.with_entry(name, |entry| Arc::clone(&entry.proxy))
    }

    /// Whether a proxy is registered under `name`.
    pub fn has_proxy(&self, name: &str) -> bool {
        self.with_entry(name, |_| ()).is_some()
    }

    /// Take the proxy out of the registry and run its `on_remove`.
    ///
    /// Absent names are a no-op (`Ok(None)`).
    pub fn remove_proxy(&self, name: &str) -> Result<Option<Arc<dyn Proxy>>, MvcError> {
        let removed = {
            let mut proxies = self
                .proxies
                .write()
                .map_err(|_| MvcError::LockPoisoned("remove_proxy"))?;
            proxies.remove(name)
        };

        Ok(removed.map(|entry| {
            debug!(name, "proxy removed");
            entry.proxy.on_remove();
            entry.proxy
        }))
    }

    /// Registered proxy names, sorted.
    pub fn proxy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.proxies.read() {
            Ok(proxies) => proxies.keys().cloned().collect(),
            Err(_) => {
                warn!("proxy registry lock poisoned");
                Vec::new()
            }
        };
        names.sort();
        names
    }

    /// Remove every proxy, running each `on_remove`.
    pub fn reset(&self) -> Result<(), MvcError> {
        let drained = {
            let mut proxies = self
                .proxies
                .write()
                .map_err(|_| MvcError::LockPoisoned("reset proxies"))?;
            std::mem::take(&mut *proxies)
        };

        debug!(proxies = drained.len(), "proxy registry reset");
        for entry in drained.into_values() {
            entry.proxy.on_remove();
        }
        Ok(())
    }

    fn with_entry<T>(&self, name: &str, f: impl FnOnce(&ProxyEntry) -> T) -> Option<T> {
        match self.proxies.read() {
            Ok(proxies) => proxies.get(name).map(f),
            Err(_) => {
                warn!(name, "proxy registry lock poisoned");
                None
            }
        }
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("proxies", &self.proxy_names())
            .finish()
    }
}
