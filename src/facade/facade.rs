//! Facade - the application context owning the bus and the three registries.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, debug_span};

use super::notifier::Notifier;
use crate::bus::NotificationBus;
use crate::command::{Command, CommandFactory, CommandRouter};
use crate::error::{require_name, MvcError};
use crate::message::Message;
use crate::model::{ComponentRegistry, Proxy};
use crate::view::{AdapterRegistry, Mediator};

pub(super) struct FacadeInner {
    name: String,
    model: ComponentRegistry,
    bus: Arc<NotificationBus>,
    controller: CommandRouter,
    view: AdapterRegistry,
}

/// Single access point to proxies, mediators, commands and notifications.
///
/// Cloning is cheap and every clone talks to the same registries. Hand a
/// [`Notifier`] rather than a clone to anything the facade stores, so that
/// stored objects do not keep the facade alive.
///
/// ## Example
///
/// ```ignore
/// let facade = Facade::with_name("shell");
///
/// facade.register_proxy(Arc::new(DataProxy::with_data("user", json!({ "id": 1 }))))?;
/// facade.register_mediator(Arc::new(LoginMediator::new(facade.notifier())))?;
/// facade.register_command_type::<LoginCommand>("user.login")?;
///
/// facade.send_notification("user.login", Some(json!({ "user": "pat" })), None)?;
/// ```
#[derive(Clone)]
pub struct Facade {
    inner: Arc<FacadeInner>,
}

impl Facade {
    /// Name used by `Facade::new()`.
    pub const DEFAULT_NAME: &'static str = "default";

    /// Create a facade named `"default"`.
    pub fn new() -> Self {
        Self::with_name(Self::DEFAULT_NAME)
    }

    /// Create a facade; `name` shows up in log spans and `Debug` output.
    pub fn with_name(name: impl Into<String>) -> Self {
        let name = name.into();

        // Model first, then the bus the controller subscribes on, then the
        // controller, then the view sharing that bus.
        let model = ComponentRegistry::new();
        let bus = Arc::new(NotificationBus::new());
        let controller = CommandRouter::new(Arc::clone(&bus));
        let view = AdapterRegistry::new(Arc::clone(&bus));

        debug!(facade = %name, "facade created");
        Self {
            inner: Arc::new(FacadeInner {
                name,
                model,
                bus,
                controller,
                view,
            }),
        }
    }

    pub(super) fn from_inner(inner: Arc<FacadeInner>) -> Self {
        Self { inner }
    }

    /// The facade's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// A weak handle for sending notifications from stored objects.
    pub fn notifier(&self) -> Notifier {
        Notifier::new(Arc::downgrade(&self.inner))
    }

    /// The proxy registry.
    pub fn model(&self) -> &ComponentRegistry {
        &self.inner.model
    }

    /// The command router.
    pub fn controller(&self) -> &CommandRouter {
        &self.inner.controller
    }

    /// The mediator registry.
    pub fn view(&self) -> &AdapterRegistry {
        &self.inner.view
    }

    /// The notification bus shared by the controller and the view.
    pub fn bus(&self) -> &NotificationBus {
        &self.inner.bus
    }

    // =========================================================================
    // Proxies
    // =========================================================================

    /// Install a proxy, evicting any proxy registered under the same name.
    pub fn register_proxy<P: Proxy>(&self, proxy: Arc<P>) -> Result<(), MvcError> {
        self.inner.model.register_proxy(proxy)
    }

    /// Typed proxy lookup.
    pub fn retrieve_proxy<P: Proxy>(&self, name: &str) -> Option<Arc<P>> {
        self.inner.model.retrieve_proxy(name)
    }

    /// Untyped proxy lookup.
    pub fn retrieve_proxy_dyn(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.inner.model.retrieve_proxy_dyn(name)
    }

    /// Whether a proxy is registered under `name`.
    pub fn has_proxy(&self, name: &str) -> bool {
        self.inner.model.has_proxy(name)
    }

    /// Remove a proxy; no-op if absent.
    pub fn remove_proxy(&self, name: &str) -> Result<Option<Arc<dyn Proxy>>, MvcError> {
        self.inner.model.remove_proxy(name)
    }

    // =========================================================================
    // Mediators
    // =========================================================================

    /// Install a mediator. `Ok(false)` if the name is already taken.
    pub fn register_mediator<M: Mediator>(&self, mediator: Arc<M>) -> Result<bool, MvcError> {
        self.inner.view.register_mediator(mediator)
    }

    /// Typed mediator lookup.
    pub fn retrieve_mediator<M: Mediator>(&self, name: &str) -> Option<Arc<M>> {
        self.inner.view.retrieve_mediator(name)
    }

    /// Untyped mediator lookup.
    pub fn retrieve_mediator_dyn(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.inner.view.retrieve_mediator_dyn(name)
    }

    /// Whether a mediator is registered under `name`.
    pub fn has_mediator(&self, name: &str) -> bool {
        self.inner.view.has_mediator(name)
    }

    /// Remove a mediator and all its subscriptions; no-op if absent.
    pub fn remove_mediator(&self, name: &str) -> Result<Option<Arc<dyn Mediator>>, MvcError> {
        self.inner.view.remove_mediator(name)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Bind `name` to a command constructor.
    pub fn register_command<C, F>(&self, name: &str, build: F) -> Result<(), MvcError>
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.inner.controller.register_command(name, build)
    }

    /// Bind `name` to a `Default` command type.
    pub fn register_command_type<C>(&self, name: &str) -> Result<(), MvcError>
    where
        C: Command + Default + 'static,
    {
        self.inner.controller.register_command_type::<C>(name)
    }

    /// Bind `name` to an already built factory.
    pub fn register_factory(&self, name: &str, factory: CommandFactory) -> Result<(), MvcError> {
        self.inner.controller.register_factory(name, factory)
    }

    /// Whether a command is bound to `name`.
    pub fn has_command(&self, name: &str) -> bool {
        self.inner.controller.has_command(name)
    }

    /// Unbind `name`; no-op if unbound.
    pub fn remove_command(&self, name: &str) -> Result<(), MvcError> {
        self.inner.controller.remove_command(name)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Build a message and deliver it to every current subscriber of `name`.
    ///
    /// Returns the number of subscriptions invoked. The message is dropped
    /// once dispatch returns.
    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Value>,
        kind: Option<&str>,
    ) -> Result<usize, MvcError> {
        let message = Message {
            name: name.to_string(),
            body,
            kind: kind.map(str::to_string),
        };
        self.notify(&message)
    }

    /// Deliver a prebuilt message.
    pub fn notify(&self, message: &Message) -> Result<usize, MvcError> {
        require_name(&message.name, "send_notification")?;
        let _span = debug_span!(
            "notify",
            facade = %self.inner.name,
            notification = %message.name
        )
        .entered();
        self.inner.bus.dispatch(message)
    }

    /// Tear everything down: mediators and proxies get `on_remove`, commands
    /// are unbound and every subscriber list is dropped.
    pub fn reset(&self) -> Result<(), MvcError> {
        self.inner.view.reset()?;
        self.inner.controller.reset()?;
        self.inner.model.reset()?;
        self.inner.bus.clear()?;
        debug!(facade = %self.inner.name, "facade reset");
        Ok(())
    }
}

impl Default for Facade {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("name", &self.inner.name)
            .field("proxies", &self.inner.model.proxy_names())
            .field("mediators", &self.inner.view.mediator_names())
            .field("commands", &self.inner.controller.command_names())
            .field("notifications", &self.inner.bus.names())
            .finish()
    }
}
