//! Session controller: who, if anyone, is signed in.
//!
//! The session starts in [`SessionStatus::Checking`] and leaves it exactly once, when
//! [`CheckSessionCommand`] resolves. From then on it only moves between `SignedOut` and
//! `SignedIn`, driven by [`LoginCommand`](crate::LoginCommand) and [`LogoutCommand`].
//!
//! The backend keeps the session in a cookie; this module never stores credentials.

use std::any::Any;

use log::{error, info, warn};
use sadtime_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, Updater,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::http::HttpClient;
use crate::login::{LoginCompute, LoginStatus};
use crate::summary::SummaryCompute;
use crate::BusinessConfig;

/// Identity handed back by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
}

impl UserRef {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_staff: false,
        }
    }
}

/// Response of `GET /auth/me/`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// The initial session check has not resolved yet.
    #[default]
    Checking,
    SignedOut,
    SignedIn(UserRef),
}

impl SessionStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Checking)
    }

    pub fn user(&self) -> Option<&UserRef> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.user().map(|user| user.username.as_str())
    }
}

/// Compute-shaped cache holding the current session.
///
/// Only the session commands write it, through [`Updater::set`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCompute {
    pub status: SessionStatus,
}

impl SessionCompute {
    pub fn signed_in(user: UserRef) -> Self {
        Self {
            status: SessionStatus::SignedIn(user),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            status: SessionStatus::SignedOut,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn user(&self) -> Option<&UserRef> {
        self.status.user()
    }

    pub fn username(&self) -> Option<&str> {
        self.status.username()
    }
}

impl SnapshotClone for SessionCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for SessionCompute {}

/// Maps a `/auth/me/` body to the resolved session.
fn resolve_me(me: MeResponse) -> SessionCompute {
    match (me.authenticated, me.user) {
        (true, Some(user)) => SessionCompute::signed_in(user),
        (true, None) => {
            warn!("CheckSessionCommand: authenticated without a user, treating as signed out");
            SessionCompute::signed_out()
        }
        (false, _) => SessionCompute::signed_out(),
    }
}

/// Asks the backend whether the current session cookie is still valid.
///
/// Every failure resolves to `SignedOut` and is only logged, so the session never stays in
/// `Checking` once this command finishes.
///
/// Dispatch explicitly via `ctx.dispatch::<CheckSessionCommand>()`.
#[derive(Default, Debug)]
pub struct CheckSessionCommand;

impl Command for CheckSessionCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let url = snap.state::<BusinessConfig>().endpoint("/auth/me/");
        let client = snap.state::<HttpClient>().clone();

        Box::pin(async move {
            info!("CheckSessionCommand: checking session at {url}");

            let session = match client.get(&url).send().await {
                Ok(response) if response.is_success() => match response.json::<MeResponse>() {
                    Ok(me) => resolve_me(me),
                    Err(e) => {
                        error!("CheckSessionCommand: Failed to parse MeResponse: {e}");
                        SessionCompute::signed_out()
                    }
                },
                Ok(response) => {
                    error!(
                        "CheckSessionCommand: session check failed with status {}",
                        response.status
                    );
                    SessionCompute::signed_out()
                }
                Err(err) => {
                    error!("CheckSessionCommand: {err}");
                    SessionCompute::signed_out()
                }
            };

            match session.username() {
                Some(username) => info!("CheckSessionCommand: signed in as '{username}'"),
                None => info!("CheckSessionCommand: no active session"),
            }
            updater.set(session);
        })
    }
}

/// Ends the session.
///
/// The local session is cleared after the request completes whatever its outcome; a failed
/// logout is only logged. The summary snapshot is dropped with it.
///
/// Dispatch explicitly via `ctx.dispatch::<LogoutCommand>()`.
#[derive(Default, Debug)]
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let url = snap.state::<BusinessConfig>().endpoint("/auth/logout/");
        let client = snap.state::<HttpClient>().clone();

        Box::pin(async move {
            match client.post(&url).send().await {
                Ok(response) if response.is_success() => {
                    info!("LogoutCommand: backend session ended");
                }
                Ok(response) => {
                    warn!(
                        "LogoutCommand: logout returned status {}, clearing local session anyway",
                        response.status
                    );
                }
                Err(err) => {
                    warn!("LogoutCommand: {err}, clearing local session anyway");
                }
            }

            updater.set(SessionCompute::signed_out());
            updater.set(LoginCompute {
                status: LoginStatus::Idle,
            });
            updater.update(SummaryCompute::remount);
        })
    }
}
