//! A small login application wired through a facade.
//!
//! - `startup` is a macro command that registers the user proxy and the
//!   login mediator.
//! - `user.login` checks credentials, stores the user in the proxy and
//!   answers with `user.logged_in` or `user.rejected`.
//! - `LoginMediator` records the answers it hears.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use relay_mvc::{Command, DataProxy, Facade, MacroCommand, Mediator, Message, MvcError, Notifier};
use serde::Deserialize;
use serde_json::json;

pub const STARTUP: &str = "startup";
pub const LOGIN: &str = "user.login";
pub const LOGGED_IN: &str = "user.logged_in";
pub const REJECTED: &str = "user.rejected";

pub const USER_PROXY: &str = "user";
pub const LOGIN_MEDIATOR: &str = "LoginMediator";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

pub struct LoginMediator {
    notifier: Notifier,
    heard: Mutex<Vec<String>>,
    pub removed: AtomicUsize,
}

impl LoginMediator {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            heard: Mutex::new(Vec::new()),
            removed: AtomicUsize::new(0),
        }
    }

    /// What the UI would do on submit.
    pub fn submit(&self, user: &str, password: &str) -> Result<usize, MvcError> {
        self.notifier.send_notification(
            LOGIN,
            Some(json!({ "user": user, "password": password })),
            None,
        )
    }

    pub fn heard(&self) -> Vec<String> {
        self.heard.lock().unwrap().clone()
    }
}

impl Mediator for LoginMediator {
    fn mediator_name(&self) -> &str {
        LOGIN_MEDIATOR
    }

    fn notification_interests(&self) -> Vec<String> {
        vec![LOGGED_IN.to_string(), REJECTED.to_string()]
    }

    fn handle_notification(&self, message: &Message) {
        let entry = match message.body_as::<String>() {
            Ok(user) => format!("{}:{}", message.name, user),
            Err(_) => message.name.clone(),
        };
        self.heard.lock().unwrap().push(entry);
    }

    fn on_remove(&self) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Registers the user proxy.
struct PrepareModel {
    notifier: Notifier,
}

impl Command for PrepareModel {
    fn execute(&mut self, _message: &Message) {
        let facade = self.notifier.facade().unwrap();
        facade
            .register_proxy(Arc::new(DataProxy::new(USER_PROXY)))
            .unwrap();
    }
}

/// Registers the login mediator.
struct PrepareView {
    notifier: Notifier,
}

impl Command for PrepareView {
    fn execute(&mut self, _message: &Message) {
        let facade = self.notifier.facade().unwrap();
        let mediator = Arc::new(LoginMediator::new(self.notifier.clone()));
        facade.register_mediator(mediator).unwrap();
    }
}

pub struct LoginCommand {
    notifier: Notifier,
}

impl Command for LoginCommand {
    fn execute(&mut self, message: &Message) {
        let facade = self.notifier.facade().unwrap();
        let credentials: Credentials = message.body_as().unwrap();

        if credentials.password != "secret" {
            facade
                .send_notification(REJECTED, Some(json!(credentials.user)), None)
                .unwrap();
            return;
        }

        let proxy = facade.retrieve_proxy::<DataProxy>(USER_PROXY).unwrap();
        proxy.set_data(json!({ "user": credentials.user })).unwrap();
        facade
            .send_notification(LOGGED_IN, Some(json!(credentials.user)), Some("session"))
            .unwrap();
    }
}

/// Bind the application's commands on `facade`.
pub fn install(facade: &Facade) {
    let notifier = facade.notifier();
    facade
        .register_command(STARTUP, move || {
            let model = notifier.clone();
            let view = notifier.clone();
            MacroCommand::new()
                .with_sub_command(move || PrepareModel {
                    notifier: model.clone(),
                })
                .with_sub_command(move || PrepareView {
                    notifier: view.clone(),
                })
        })
        .unwrap();

    let notifier = facade.notifier();
    facade
        .register_command(LOGIN, move || LoginCommand {
            notifier: notifier.clone(),
        })
        .unwrap();
}
