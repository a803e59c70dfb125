//! Proxy store: overwrite on duplicate, lifecycle hooks, typed lookup.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use relay_mvc::{DataProxy, Facade, Notifier, Proxy};
use serde_json::json;

use crate::support::CountingProxy;

#[test]
fn second_registration_overwrites_and_disposes_the_first() {
    let facade = Facade::new();
    let first = Arc::new(DataProxy::with_data("user", json!({ "id": 1 })));
    let second = Arc::new(DataProxy::with_data("user", json!({ "id": 2 })));

    facade.register_proxy(Arc::clone(&first)).unwrap();
    facade.register_proxy(Arc::clone(&second)).unwrap();

    let current = facade.retrieve_proxy::<DataProxy>("user").unwrap();
    assert_eq!(current.data(), Some(json!({ "id": 2 })));
    assert!(!first.is_registered());
    assert!(second.is_registered());
}

/// Records what the registry looked like when it was evicted.
struct Watching {
    notifier: Notifier,
    seen_on_remove: Mutex<Option<bool>>,
}

impl Proxy for Watching {
    fn proxy_name(&self) -> &str {
        "settings"
    }

    fn on_remove(&self) {
        let facade = self.notifier.facade().unwrap();
        *self.seen_on_remove.lock().unwrap() = Some(facade.has_proxy("settings"));
    }
}

#[test]
fn eviction_runs_before_the_new_proxy_registers() {
    let facade = Facade::new();
    let first = Arc::new(Watching {
        notifier: facade.notifier(),
        seen_on_remove: Mutex::new(None),
    });
    let second = Arc::new(CountingProxy::new("settings"));

    facade.register_proxy(Arc::clone(&first)).unwrap();
    facade.register_proxy(Arc::clone(&second)).unwrap();

    // The old holder was gone and the new one not yet installed.
    assert_eq!(*first.seen_on_remove.lock().unwrap(), Some(false));
    assert_eq!(second.registered.load(Ordering::SeqCst), 1);
    assert_eq!(second.removed.load(Ordering::SeqCst), 0);
    assert!(facade.retrieve_proxy::<CountingProxy>("settings").is_some());
}

#[test]
fn eviction_hooks_run_once_each() {
    let facade = Facade::new();
    let first = Arc::new(CountingProxy::new("settings"));
    let second = Arc::new(CountingProxy::new("settings"));

    facade.register_proxy(Arc::clone(&first)).unwrap();
    facade.register_proxy(Arc::clone(&second)).unwrap();

    assert_eq!(first.registered.load(Ordering::SeqCst), 1);
    assert_eq!(first.removed.load(Ordering::SeqCst), 1);
    assert_eq!(second.registered.load(Ordering::SeqCst), 1);
    assert_eq!(second.removed.load(Ordering::SeqCst), 0);
}

#[test]
fn lookups_on_absent_names() {
    let facade = Facade::new();
    assert!(!facade.has_proxy("missing"));
    assert!(facade.retrieve_proxy::<DataProxy>("missing").is_none());
    assert!(facade.retrieve_proxy_dyn("missing").is_none());
    assert!(facade.remove_proxy("missing").unwrap().is_none());
}

#[test]
fn remove_returns_the_proxy_and_runs_its_hook() {
    let facade = Facade::new();
    let proxy = Arc::new(CountingProxy::new("cache"));
    facade.register_proxy(Arc::clone(&proxy)).unwrap();

    let removed = facade.remove_proxy("cache").unwrap().unwrap();
    assert_eq!(removed.proxy_name(), "cache");
    assert_eq!(proxy.removed.load(Ordering::SeqCst), 1);
    assert!(!facade.has_proxy("cache"));
}

#[test]
fn proxies_do_not_touch_the_bus() {
    let facade = Facade::new();
    facade
        .register_proxy(Arc::new(DataProxy::new("user")))
        .unwrap();
    assert!(facade.bus().names().is_empty());
}
