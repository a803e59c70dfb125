//! Named-message decoupling for in-process components.
//!
//! Proxies hold data, mediators adapt views, commands carry business logic;
//! none of them reference each other. They meet on a [`NotificationBus`]
//! through notification names, all reached from one [`Facade`].

pub mod bus;
pub mod command;
mod error;
pub mod facade;
mod message;
pub mod model;
pub mod view;

pub use bus::{NotificationBus, SubscriberId, Subscription};
pub use command::{Command, CommandFactory, CommandRouter, MacroCommand};
pub use error::MvcError;
pub use facade::{Facade, Notifier};
pub use message::Message;
pub use model::{ComponentRegistry, DataProxy, Proxy};
pub use view::{AdapterRegistry, Mediator};
