//! # Authentication Types
//!
//! Wire types for the external login endpoint. The HTTP call itself lives in
//! the app layer; the CORE only knows what goes over the wire and how a
//! rejection turns into alert text.

use crate::primitives::LOGIN_FAILED_MESSAGE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed-in user as returned by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier; numeric or string depending on the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Name to greet the user with, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Request body for the auth endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
}

impl Credentials {
    #[must_use]
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Login {
            email: email.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credentials::Register {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Credentials::Login { email, .. } | Credentials::Register { email, .. } => email,
        }
    }
}

// Passwords never reach logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Register { name, email, .. } => f
                .debug_struct("Register")
                .field("name", name)
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Response body from the auth endpoint: `{user}` on success, `{message}` on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthReply {
    /// Alert text for a non-2xx reply: the server message or a generic fallback.
    #[must_use]
    pub fn rejection_message(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(LOGIN_FAILED_MESSAGE)
            .to_string()
    }
}
