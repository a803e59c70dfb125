//! Commands, command factories and macro commands.

use std::sync::Arc;

use crate::message::Message;

/// A unit of business logic bound to a notification name.
///
/// The router builds a fresh command for every message it routes and drops
/// it right after `execute`, so commands carry no state across messages.
/// Closures taking `&Message` are commands too.
pub trait Command: Send {
    /// Handle one message.
    fn execute(&mut self, message: &Message);
}

impl<F> Command for F
where
    F: FnMut(&Message) + Send,
{
    fn execute(&mut self, message: &Message) {
        self(message)
    }
}

/// Builds a new command per invocation.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// Wrap a constructor closure as a `CommandFactory`.
pub fn factory<C, F>(build: F) -> CommandFactory
where
    C: Command + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    Arc::new(move || Box::new(build()) as Box<dyn Command>)
}

/// Factory for a `Default` command type.
pub fn factory_of<C>() -> CommandFactory
where
    C: Command + Default + 'static,
{
    factory(C::default)
}

/// A command that runs an ordered list of sub-commands.
///
/// Each sub-command is built from its factory when the macro command
/// executes, runs once, and is dropped before the next one is built.
///
/// ```ignore
/// router.register_command("STARTUP", || {
///     MacroCommand::new()
///         .with_sub_command(PrepModelCommand::default)
///         .with_sub_command(PrepViewCommand::default)
/// })?;
/// ```
#[derive(Default, Clone)]
pub struct MacroCommand {
    sub_commands: Vec<CommandFactory>,
}

impl MacroCommand {
    /// Create an empty macro command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-command. Builder form of `add_sub_command`.
    pub fn with_sub_command<C, F>(mut self, build: F) -> Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.add_sub_command(factory(build));
        self
    }

    /// Append a sub-command factory.
    pub fn add_sub_command(&mut self, factory: CommandFactory) {
        self.sub_commands.push(factory);
    }

    /// Number of sub-commands.
    pub fn len(&self) -> usize {
        self.sub_commands.len()
    }

    /// Whether there are no sub-commands.
    pub fn is_empty(&self) -> bool {
        self.sub_commands.is_empty()
    }
}

impl Command for MacroCommand {
    fn execute(&mut self, message: &Message) {
        for build in &self.sub_commands {
            let mut command = build();
            command.execute(message);
        }
    }
}
