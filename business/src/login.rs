//! Login form input and the login flow.
//!
//! [`LoginCommand`] posts the typed credentials to `/auth/login/`. On success the session
//! becomes `SignedIn`; on any failure the session is left alone and the failure message is
//! kept on [`LoginCompute`] for the form to show.

use std::any::Any;

use log::{error, info, warn};
use sadtime_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, State, Updater,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::http::HttpClient;
use crate::session::{SessionCompute, UserRef};

/// Message shown when the backend gives no usable reason for a failed login.
pub const DEFAULT_LOGIN_ERROR: &str = "Login failed";

/// Editable fields of the login form.
#[derive(Default, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields carry something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.trim().is_empty()
    }
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SnapshotClone for LoginInput {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for LoginInput {}

/// Body of `POST /auth/login/`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl From<&LoginInput> for LoginRequest {
    fn from(input: &LoginInput) -> Self {
        Self {
            username: input.username.clone(),
            password: input.password.clone(),
        }
    }
}

/// Successful response of `POST /auth/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserRef,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body the backend sends with a rejected login.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoginStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl LoginStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of the most recent login attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginCompute {
    pub status: LoginStatus,
}

impl LoginCompute {
    pub fn pending() -> Self {
        Self {
            status: LoginStatus::Pending,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Failed(message.into()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }
}

impl SnapshotClone for LoginCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for LoginCompute {}

/// The backend's `error` field, or [`DEFAULT_LOGIN_ERROR`] when it is missing or blank.
pub fn extract_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string())
}

/// Manual-only command that signs the user in with the credentials in [`LoginInput`].
///
/// ## Flow
/// 1. `LoginCompute` becomes `Pending` before the request is sent.
/// 2. A 2xx response with a `user` object sets the session to `SignedIn(user)` and the
///    login to `Succeeded`.
/// 3. Anything else sets the login to `Failed(message)`; the session does not change.
///
/// Dispatch explicitly via `ctx.dispatch::<LoginCommand>()`.
#[derive(Default, Debug)]
pub struct LoginCommand;

impl Command for LoginCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let request = LoginRequest::from(snap.state::<LoginInput>());
        let url = snap.state::<BusinessConfig>().endpoint("/auth/login/");
        let client = snap.state::<HttpClient>().clone();

        updater.set(LoginCompute::pending());

        Box::pin(async move {
            info!("LoginCommand: signing in as '{}'", request.username);

            let builder = match client.post(&url).json(&request) {
                Ok(builder) => builder,
                Err(e) => {
                    error!("LoginCommand: Failed to serialize LoginRequest: {e}");
                    updater.set(LoginCompute::failed(DEFAULT_LOGIN_ERROR));
                    return;
                }
            };

            match builder.send().await {
                Ok(response) if response.is_success() => match response.json::<LoginResponse>() {
                    Ok(body) => {
                        info!("LoginCommand: signed in as '{}'", body.user.username);
                        updater.set(SessionCompute::signed_in(body.user));
                        updater.set(LoginCompute {
                            status: LoginStatus::Succeeded,
                        });
                    }
                    Err(e) => {
                        error!("LoginCommand: Failed to parse LoginResponse: {e}");
                        updater.set(LoginCompute::failed(DEFAULT_LOGIN_ERROR));
                    }
                },
                Ok(response) => {
                    let message = extract_error_message(&response.body);
                    warn!(
                        "LoginCommand: login rejected with status {}: {message}",
                        response.status
                    );
                    updater.set(LoginCompute::failed(message));
                }
                Err(err) => {
                    error!("LoginCommand: {err}");
                    updater.set(LoginCompute::failed(DEFAULT_LOGIN_ERROR));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_uses_backend_text() {
        let message = extract_error_message(br#"{"error": "Invalid credentials"}"#);
        assert_eq!(message, "Invalid credentials");
    }

    #[test]
    fn test_extract_error_message_defaults() {
        assert_eq!(extract_error_message(b""), DEFAULT_LOGIN_ERROR);
        assert_eq!(extract_error_message(b"<html>502</html>"), DEFAULT_LOGIN_ERROR);
        assert_eq!(extract_error_message(br#"{"detail": "nope"}"#), DEFAULT_LOGIN_ERROR);
        assert_eq!(extract_error_message(br#"{"error": ""}"#), DEFAULT_LOGIN_ERROR);
    }

    #[test]
    fn test_login_input_is_complete() {
        assert!(LoginInput::new("analyst", "hunter2").is_complete());
        assert!(!LoginInput::new("analyst", "").is_complete());
        assert!(!LoginInput::new("  ", "hunter2").is_complete());
        assert!(!LoginInput::default().is_complete());
    }

    #[test]
    fn test_login_input_debug_hides_password() {
        let debug = format!("{:?}", LoginInput::new("analyst", "hunter2"));
        assert!(debug.contains("analyst"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_login_request_keeps_fields_verbatim() {
        let input = LoginInput::new(" analyst", "pass word ");
        let body = serde_json::to_value(LoginRequest::from(&input)).expect("Should serialize");
        assert_eq!(
            body,
            serde_json::json!({ "username": " analyst", "password": "pass word " })
        );
    }

    #[test]
    fn test_login_status_accessors() {
        assert!(LoginCompute::pending().is_pending());
        assert_eq!(LoginCompute::failed("nope").error(), Some("nope"));
        assert_eq!(LoginCompute::default().error(), None);
    }

    #[test]
    fn test_login_response_parses_user() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"user": {"username": "analyst", "is_staff": false}, "message": "Login successful"}"#,
        )
        .expect("Should deserialize");
        assert_eq!(body.user, UserRef::new("analyst"));
        assert_eq!(body.message.as_deref(), Some("Login successful"));
    }
}
