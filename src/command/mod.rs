//! Commands - stateless business logic routed by notification name.
//!
//! ## Quick Start
//!
//! ```ignore
//! use relay_mvc::{Command, Facade, Message};
//!
//! #[derive(Default)]
//! struct LoginCommand;
//!
//! impl Command for LoginCommand {
//!     fn execute(&mut self, message: &Message) {
//!         // ...
//!     }
//! }
//!
//! let facade = Facade::new();
//! facade.register_command_type::<LoginCommand>("user.login")?;
//! facade.send_notification("user.login", None, None)?;
//! ```

#[allow(clippy::module_inception)]
mod command;
mod router;

pub use command::{factory, factory_of, Command, CommandFactory, MacroCommand};
pub use router::CommandRouter;

/// Bind several `Default` command types in one go.
///
/// Works on anything with a `register_command_type` method (`Facade`,
/// `CommandRouter`) and stops at the first error.
///
/// # Example
/// ```ignore
/// relay_mvc::register_commands!(
///     facade,
///     "STARTUP" => commands::Startup,
///     "user.login" => commands::Login,
/// )?;
/// ```
#[cfg(feature = "macros")]
#[macro_export]
macro_rules! register_commands {
    ($target:expr, $( $name:expr => $($seg:ident)::+ ),+ $(,)?) => {{
        let target = &$target;
        (|| -> ::std::result::Result<(), $crate::MvcError> {
            $(
                target.register_command_type::<$($seg)::+>($name)?;
            )+
            Ok(())
        })()
    }};
}
