//! Wire types and validation for the WebLocker backend API.
//!
//! This crate is shared by the client and any other consumer of the
//! request schema to prevent drift. The server remains the authority on
//! the protected-website list; clients construct requests here and decode
//! the snapshot the server returns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Endpoint paths, joined onto the configured API base URL.
pub const LOGIN_ENDPOINT: &str = "login.php";
pub const USER_ENDPOINT: &str = "user.php";
pub const AUTH_ENDPOINT: &str = "auth.php";

/// A protected website as reported by the server.
///
/// `unlock_timestamp` (epoch seconds) is present only while the site is
/// unlocked; a site that was never unlocked carries no timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Website {
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_timestamp: Option<i64>,
}

/// Normalized host -> website record. Replaced wholesale from every
/// successful server response, never patched locally.
pub type WebsiteMap = HashMap<String, Website>;

/// Envelope shared by all three endpoints.
///
/// A missing `websites` field on a successful response means an empty
/// list, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub websites: Option<WebsiteMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// The website snapshot, treating an absent map as empty.
    pub fn websites_or_empty(&self) -> WebsiteMap {
        self.websites.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserLookupRequest {
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Add,
    Remove,
    Toggle,
}

/// Mutating request against the protected-website list.
///
/// Which optional fields are required depends on the action; use the
/// constructors and `validate` rather than building this by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthActionRequest {
    pub action: AuthAction,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<bool>,
}

impl AuthActionRequest {
    pub fn add(username: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            action: AuthAction::Add,
            username: username.into(),
            url: Some(url.into()),
            host: None,
            lock: None,
        }
    }

    pub fn remove(username: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            action: AuthAction::Remove,
            username: username.into(),
            url: None,
            host: Some(host.into()),
            lock: None,
        }
    }

    pub fn toggle(username: impl Into<String>, host: impl Into<String>, lock: bool) -> Self {
        Self {
            action: AuthAction::Toggle,
            username: username.into(),
            url: None,
            host: Some(host.into()),
            lock: Some(lock),
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        require_string(Some(self.username.as_str()), "username")?;

        match self.action {
            AuthAction::Add => {
                require_string(self.url.as_deref(), "url")?;
            }
            AuthAction::Remove => {
                require_string(self.host.as_deref(), "host")?;
            }
            AuthAction::Toggle => {
                require_string(self.host.as_deref(), "host")?;
                require_bool(self.lock, "lock")?;
            }
        }

        Ok(())
    }
}

/// Schema-level problem with an outgoing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestError {
    pub code: String,
    pub message: String,
}

impl RequestError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RequestError {}

fn require_string(value: Option<&str>, field: &str) -> Result<(), RequestError> {
    if let Some(candidate) = value {
        if !candidate.trim().is_empty() {
            return Ok(());
        }
    }
    Err(RequestError::new(
        "missing_field",
        format!("{} is required", field),
    ))
}

fn require_bool(value: Option<bool>, field: &str) -> Result<(), RequestError> {
    match value {
        Some(_) => Ok(()),
        None => Err(RequestError::new(
            "missing_field",
            format!("{} is required", field),
        )),
    }
}
