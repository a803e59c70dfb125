//! CommandRouter - binds notification names to command factories.
//!
//! The router keeps exactly one bus subscription per bound name, however
//! many times a factory is registered for it. Every routed message gets a
//! freshly built command.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use super::command::{factory, factory_of, Command, CommandFactory};
use crate::bus::{NotificationBus, SubscriberId, Subscription};
use crate::error::{require_name, MvcError};
use crate::message::Message;

type CommandMap = RwLock<HashMap<String, CommandFactory>>;

/// Routes notifications to per-message commands.
pub struct CommandRouter {
    id: SubscriberId,
    bus: Arc<NotificationBus>,
    commands: Arc<CommandMap>,
}

impl CommandRouter {
    /// Create a router that subscribes on `bus`.
    pub fn new(bus: Arc<NotificationBus>) -> Self {
        Self {
            id: SubscriberId::next(),
            bus,
            commands: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The identity the router subscribes under.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Bind `name` to a command constructor.
    ///
    /// The first binding for a name subscribes the router on the bus; later
    /// bindings only swap the factory.
    pub fn register_command<C, F>(&self, name: &str, build: F) -> Result<(), MvcError>
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.register_factory(name, factory(build))
    }

    /// Bind `name` to a `Default` command type.
    pub fn register_command_type<C>(&self, name: &str) -> Result<(), MvcError>
    where
        C: Command + Default + 'static,
    {
        self.register_factory(name, factory_of::<C>())
    }

    /// Bind `name` to an already built factory.
    pub fn register_factory(&self, name: &str, factory: CommandFactory) -> Result<(), MvcError> {
        require_name(name, "register_command")?;

        let replaced = {
            let mut commands = self
                .commands
                .write()
                .map_err(|_| MvcError::LockPoisoned("register_command"))?;

            if !commands.contains_key(name) {
                self.bus.subscribe(name, self.trampoline())?;
            }
            commands.insert(name.to_string(), factory)
        };

        debug!(name, replaced = replaced.is_some(), "command registered");
        Ok(())
    }

    /// Whether a factory is bound to `name`.
    pub fn has_command(&self, name: &str) -> bool {
        match self.commands.read() {
            Ok(commands) => commands.contains_key(name),
            Err(_) => {
                warn!(name, "command map lock poisoned");
                false
            }
        }
    }

    /// Unbind `name` and drop the router's subscription for it. Unbound
    /// names are ignored.
    pub fn remove_command(&self, name: &str) -> Result<(), MvcError> {
        let removed = {
            let mut commands = self
                .commands
                .write()
                .map_err(|_| MvcError::LockPoisoned("remove_command"))?;
            let removed = commands.remove(name);
            if removed.is_some() {
                self.bus.release(name, self.id)?;
            }
            removed
        };

        if removed.is_some() {
            debug!(name, "command removed");
        }
        Ok(())
    }

    /// Build and run the command bound to `message.name`, if any.
    pub fn execute_command(&self, message: &Message) {
        run_command(&self.commands, message);
    }

    /// Names with a bound factory, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .read()
            .map(|commands| commands.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Unbind every command and drop the matching subscriptions.
    pub fn reset(&self) -> Result<(), MvcError> {
        let drained = {
            let mut commands = self
                .commands
                .write()
                .map_err(|_| MvcError::LockPoisoned("reset commands"))?;
            std::mem::take(&mut *commands)
        };

        for name in drained.keys() {
            self.bus.release(name, self.id)?;
        }
        debug!(commands = drained.len(), "command router reset");
        Ok(())
    }

    /// The subscription registered once per bound name.
    fn trampoline(&self) -> Subscription {
        let commands = Arc::downgrade(&self.commands);
        Subscription::new(self.id, move |message| {
            if let Some(commands) = commands.upgrade() {
                run_command(&commands, message);
            }
        })
    }
}

fn run_command(commands: &CommandMap, message: &Message) {
    let factory = match commands.read() {
        Ok(commands) => commands.get(&message.name).cloned(),
        Err(_) => {
            warn!(notification = %message.name, "command map lock poisoned");
            return;
        }
    };

    let Some(build) = factory else {
        trace!(notification = %message.name, "no command bound");
        return;
    };

    let mut command = build();
    command.execute(message);
}

impl fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRouter")
            .field("id", &self.id)
            .field("commands", &self.command_names())
            .finish()
    }
}
