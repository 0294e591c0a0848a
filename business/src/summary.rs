//! Analytics summary shown on the dashboard.

use std::any::Any;

use log::{error, info};
use sadtime_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, Updater,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::http::HttpClient;

/// Aggregate counters from `GET /analytics/summary/`.
///
/// Every field is required; a body missing one fails to parse as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_events: u64,
    pub events_last_24h: u64,
    pub events_last_7d: u64,
    pub total_indicators: u64,
    pub total_techniques_used: u64,
}

impl Summary {
    /// The counters in display order, paired with their labels.
    pub fn counters(&self) -> [(&'static str, u64); 5] {
        [
            ("Total Events", self.total_events),
            ("Last 24h", self.events_last_24h),
            ("Last 7 Days", self.events_last_7d),
            ("Indicators", self.total_indicators),
            ("Techniques Used", self.total_techniques_used),
        ]
    }
}

/// Latest summary snapshot, `None` until a fetch succeeds.
///
/// `mount` counts how often the dashboard has been entered or left. A fetch only lands in the
/// mount it was started from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryCompute {
    pub summary: Option<Summary>,
    mount: u64,
}

impl SummaryCompute {
    pub fn loaded(summary: Summary) -> Self {
        Self {
            summary: Some(summary),
            mount: 0,
        }
    }

    pub fn mount(&self) -> u64 {
        self.mount
    }

    /// An empty snapshot for the next mount.
    pub fn remounted(&self) -> Self {
        Self {
            summary: None,
            mount: self.mount.wrapping_add(1),
        }
    }

    pub fn remount(&mut self) {
        *self = self.remounted();
    }
}

impl SnapshotClone for SummaryCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for SummaryCompute {}

/// Fetches the summary once for the current mount.
///
/// A failed fetch only logs; the previous snapshot (if any) stays in place. A result that
/// arrives after the mount changed (logout, or leaving and re-entering the dashboard) is
/// discarded.
#[derive(Default, Debug)]
pub struct FetchSummaryCommand;

impl Command for FetchSummaryCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let url = snap.state::<BusinessConfig>().endpoint("/analytics/summary/");
        let client = snap.state::<HttpClient>().clone();
        let mount = snap.compute::<SummaryCompute>().mount();

        Box::pin(async move {
            match client.get(&url).send().await {
                Ok(response) if response.is_success() => match response.json::<Summary>() {
                    Ok(summary) => {
                        info!("FetchSummaryCommand: {} events in total", summary.total_events);
                        updater.update(move |current: &mut SummaryCompute| {
                            if current.mount == mount {
                                current.summary = Some(summary);
                            } else {
                                info!("FetchSummaryCommand: mount {mount} is gone, dropping result");
                            }
                        });
                    }
                    Err(e) => error!("FetchSummaryCommand: Failed to parse Summary: {e}"),
                },
                Ok(response) => {
                    error!(
                        "FetchSummaryCommand: summary request failed with status {}",
                        response.status
                    );
                }
                Err(err) => error!("FetchSummaryCommand: {err}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_keep_values_and_order() {
        let summary: Summary = serde_json::from_str(
            r#"{"total_events": 120, "events_last_24h": 5, "events_last_7d": 40,
                "total_indicators": 12, "total_techniques_used": 3}"#,
        )
        .expect("Should deserialize");

        assert_eq!(
            summary.counters(),
            [
                ("Total Events", 120),
                ("Last 24h", 5),
                ("Last 7 Days", 40),
                ("Indicators", 12),
                ("Techniques Used", 3),
            ]
        );
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = serde_json::from_str::<Summary>(
            r#"{"total_events": 120, "events_last_24h": 5, "events_last_7d": 40,
                "total_indicators": 12}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let result = serde_json::from_str::<Summary>(
            r#"{"total_events": -1, "events_last_24h": 5, "events_last_7d": 40,
                "total_indicators": 12, "total_techniques_used": 3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let summary: Summary = serde_json::from_str(
            r#"{"total_events": 1, "events_last_24h": 2, "events_last_7d": 3,
                "total_indicators": 4, "total_techniques_used": 5, "top_actor": "APT"}"#,
        )
        .expect("Should deserialize");
        assert_eq!(summary.counters().len(), 5);
    }

    #[test]
    fn test_remount_drops_snapshot_and_advances() {
        let mut compute = SummaryCompute::loaded(Summary::default());
        compute.remount();

        assert!(compute.summary.is_none());
        assert_eq!(compute.mount(), 1);
        assert_eq!(compute.remounted().mount(), 2);
    }
}
