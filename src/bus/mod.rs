//! Notification bus - named subscriber lists and synchronous dispatch.
//!
//! Every other component is layered on top of the bus:
//!
//! ```text
//! ┌──────────────┐  ┌───────────────┐  ┌─────────────────┐
//! │ direct       │  │ CommandRouter │  │ AdapterRegistry │
//! │ closures     │  │ (trampoline)  │  │ (mediators)     │
//! └──────┬───────┘  └───────┬───────┘  └────────┬────────┘
//!        │ subscribe        │ one per name      │ one per interest
//!        ▼                  ▼                   ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                    NotificationBus                      │
//! │  name -> [Subscription { id, callback }, ...]           │
//! │  dispatch(message): call each, in order, in-thread      │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod notification_bus;
mod subscription;

pub use notification_bus::NotificationBus;
pub use subscription::{Callback, SubscriberId, Subscription};
