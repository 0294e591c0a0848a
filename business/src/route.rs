//! Which page a front end shows.

use std::any::Any;

use sadtime_states::{SnapshotClone, State};
use serde::{Deserialize, Serialize};

use crate::session::SessionStatus;

/// Represents the current page/route of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Shown until the initial session check resolves
    #[default]
    Loading,
    /// Login form, shown when nobody is signed in
    Login,
    /// Analytics summary of the signed-in user
    Dashboard,
}

impl From<&SessionStatus> for Route {
    fn from(status: &SessionStatus) -> Self {
        match status {
            SessionStatus::Checking => Self::Loading,
            SessionStatus::SignedOut => Self::Login,
            SessionStatus::SignedIn(_) => Self::Dashboard,
        }
    }
}

impl SnapshotClone for Route {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

impl State for Route {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserRef;

    #[test]
    fn test_route_default_is_loading() {
        assert_eq!(Route::default(), Route::Loading);
    }

    #[test]
    fn test_route_follows_session() {
        assert_eq!(Route::from(&SessionStatus::Checking), Route::Loading);
        assert_eq!(Route::from(&SessionStatus::SignedOut), Route::Login);
        assert_eq!(
            Route::from(&SessionStatus::SignedIn(UserRef::new("analyst"))),
            Route::Dashboard
        );
    }
}
