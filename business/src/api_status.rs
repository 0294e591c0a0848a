use std::any::Any;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use sadtime_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, Time, Updater,
};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::http::HttpClient;

/// Minutes between two health checks.
pub const HEALTH_CHECK_INTERVAL_MINUTES: i64 = 5;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ApiStatus {
    last_update_time: Option<DateTime<Utc>>,
    // present when the last check failed
    last_error: Option<String>,
    is_fetching: bool,
}

pub enum APIAvailability<'a> {
    Available(DateTime<Utc>),
    Unavailable((DateTime<Utc>, &'a str)),
    Unknown,
}

impl ApiStatus {
    pub fn available(at: DateTime<Utc>) -> Self {
        Self {
            last_update_time: Some(at),
            last_error: None,
            is_fetching: false,
        }
    }

    pub fn unavailable(at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            last_update_time: Some(at),
            last_error: Some(error.into()),
            is_fetching: false,
        }
    }

    pub fn api_availability(&self) -> APIAvailability<'_> {
        match (self.last_update_time, &self.last_error) {
            (Some(time), None) => APIAvailability::Available(time),
            (Some(time), Some(err)) => APIAvailability::Unavailable((time, err.as_str())),
            (None, _) => APIAvailability::Unknown,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// A check is due when none is in flight and the last one is missing or stale.
    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.is_fetching {
            return false;
        }
        match self.last_update_time {
            Some(last) => {
                now.signed_duration_since(last).num_minutes() >= HEALTH_CHECK_INTERVAL_MINUTES
            }
            None => true,
        }
    }

    fn fetching(&self) -> Self {
        Self {
            is_fetching: true,
            ..self.clone()
        }
    }
}

impl SnapshotClone for ApiStatus {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for ApiStatus {}

/// Probes `GET /health/` when a check is due at the snapshot's [`Time`].
///
/// `is_fetching` is raised before the future is returned, so a front end that dispatches on
/// every frame still has at most one check in flight.
#[derive(Default, Debug)]
pub struct HealthCheckCommand;

impl Command for HealthCheckCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let now = *snap.state::<Time>().as_ref();
        let status = snap.compute::<ApiStatus>();

        if !status.should_refresh(now) {
            debug!("HealthCheckCommand: no check due at {now:?}");
            return Box::pin(async {});
        }
        updater.set(status.fetching());

        let url = snap.state::<BusinessConfig>().endpoint("/health/");
        let client = snap.state::<HttpClient>().clone();

        Box::pin(async move {
            info!("Get API Status at {now:?}");
            match client.get(&url).send().await {
                Ok(response) if response.is_success() => {
                    info!("BackEnd Available, checked at {now:?}");
                    updater.set(ApiStatus::available(now));
                }
                Ok(response) => {
                    let message = format!("status code {}", response.status);
                    info!("BackEnd Return with {message}");
                    updater.set(ApiStatus::unavailable(now, message));
                }
                Err(err) => {
                    error!("API status check failed: {err}");
                    updater.set(ApiStatus::unavailable(now, err.to_string()));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).single().expect("valid time")
    }

    #[test]
    fn test_first_check_is_due() {
        assert!(ApiStatus::default().should_refresh(at(0)));
        assert!(matches!(
            ApiStatus::default().api_availability(),
            APIAvailability::Unknown
        ));
    }

    #[test]
    fn test_next_check_waits_five_minutes() {
        let status = ApiStatus::available(at(0));
        assert!(!status.should_refresh(at(4)));
        assert!(status.should_refresh(at(5)));
    }

    #[test]
    fn test_no_check_while_fetching() {
        let status = ApiStatus::default().fetching();
        assert!(status.is_fetching());
        assert!(!status.should_refresh(at(30)));
    }

    #[test]
    fn test_fetching_keeps_previous_result() {
        let status = ApiStatus::unavailable(at(0), "status code 503").fetching();
        match status.api_availability() {
            APIAvailability::Unavailable((time, err)) => {
                assert_eq!(time, at(0));
                assert_eq!(err, "status code 503");
            }
            _ => panic!("expected unavailable"),
        }
    }
}
