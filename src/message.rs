//! The message envelope broadcast through the bus.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named notification with an optional body and an optional kind.
///
/// Messages are built right before a dispatch and handed to subscribers by
/// reference, so a subscriber only sees a message for the duration of the
/// call that delivered it. Clone it to keep it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Notification name (e.g., "user.login", "STARTUP").
    pub name: String,
    /// Opaque payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Optional classifier subscribers can branch on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Message {
    /// Create a message with no body and no kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
            kind: None,
        }
    }

    /// Create a message whose body is a serialized value.
    pub fn encode<T: Serialize>(
        name: impl Into<String>,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(name).with_body(serde_json::to_value(body)?))
    }

    /// Attach a body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a kind.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Decode the body into a typed value. A missing body decodes as JSON `null`.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone().unwrap_or(Value::Null))
    }

    /// Get the kind as a string slice.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification Name: {}", self.name)?;
        match &self.body {
            Some(body) => write!(f, "\nBody:{}", body)?,
            None => write!(f, "\nBody:null")?,
        }
        write!(f, "\nType:{}", self.kind().unwrap_or("null"))
    }
}
