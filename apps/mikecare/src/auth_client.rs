//! # Authentication Client
//!
//! Single POST to the external auth endpoint. No retries: a failure ends the
//! attempt and the user must try again.

use mikecare_core::primitives::LOGIN_ERROR_MESSAGE;
use mikecare_core::{AuthReply, Credentials, User};
use std::time::Duration;
use thiserror::Error;

/// Errors from the authentication client.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The endpoint answered with a non-2xx status.
    #[error("login rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The endpoint could not be reached.
    #[error("auth endpoint unreachable: {0}")]
    Network(String),

    /// The endpoint answered with a body we could not use.
    #[error("unreadable auth response: {0}")]
    Parse(String),
}

impl AuthError {
    /// Text to show the user for this failure.
    #[must_use]
    pub fn alert_text(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } => message.clone(),
            AuthError::Network(_) | AuthError::Parse(_) => LOGIN_ERROR_MESSAGE.to_string(),
        }
    }
}

/// HTTP client for the authentication endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    url: String,
}

impl AuthClient {
    /// Create a client for the given endpoint URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit credentials and return the signed-in user.
    ///
    /// The body is parsed before the status is checked, so a non-2xx reply
    /// without a JSON body counts as a parse failure.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let resp = self
            .http
            .post(&self.url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("{}: {e}", self.url)))?;

        let status = resp.status();
        let reply: AuthReply = resp
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: reply.rejection_message(),
            });
        }

        reply
            .user
            .ok_or_else(|| AuthError::Parse("response has no user".to_string()))
    }
}
