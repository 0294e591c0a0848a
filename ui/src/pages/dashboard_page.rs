//! Dashboard page for signed-in users.
//!
//! Header with the user and a logout button, followed by the analytics summary.

use crate::{state::State, widgets};
use egui::{Response, Ui};
use sadtime_business::{LogoutCommand, SessionCompute, SummaryCompute};

pub fn dashboard_page(state: &mut State, ui: &mut Ui) -> Response {
    let user = state.ctx.compute::<SessionCompute>().user().cloned();
    let summary = state.ctx.compute::<SummaryCompute>().summary;

    let mut logout = false;
    let response = ui
        .vertical(|ui| {
            if let Some(user) = &user {
                logout = widgets::dashboard_header(ui, user);
            }
            ui.separator();
            ui.add_space(12.0);
            widgets::summary_view(ui, summary.as_ref());
        })
        .response;

    if logout {
        state.ctx.dispatch::<LogoutCommand>();
    }

    response
}

#[cfg(test)]
mod dashboard_page_test {
    use egui_kittest::Harness;
    use kittest::Queryable;
    use sadtime_business::{SessionCompute, Summary, SummaryCompute, UserRef};

    use crate::state::State;

    fn signed_in_state(summary: Option<Summary>) -> State {
        let mut state = State::test("http://127.0.0.1:9".to_string());
        state
            .ctx
            .record_compute(SessionCompute::signed_in(UserRef::new("analyst")));
        state
            .ctx
            .record_compute(summary.map(SummaryCompute::loaded).unwrap_or_default());
        state
    }

    #[test]
    fn test_dashboard_shows_header() {
        let harness = Harness::new_ui_state(
            |ui, state: &mut State| {
                super::dashboard_page(state, ui);
            },
            signed_in_state(None),
        );

        assert!(harness.query_by_label("SADTIME Dashboard").is_some());
        assert!(harness.query_by_label_contains("Welcome, analyst").is_some());
        assert!(harness.query_by_label("Logout").is_some());
        assert!(harness.query_by_label("Loading...").is_some());
    }

    #[test]
    fn test_dashboard_shows_counters() {
        let summary = Summary {
            total_events: 120,
            events_last_24h: 5,
            events_last_7d: 40,
            total_indicators: 12,
            total_techniques_used: 3,
        };
        let harness = Harness::new_ui_state(
            |ui, state: &mut State| {
                super::dashboard_page(state, ui);
            },
            signed_in_state(Some(summary)),
        );

        assert!(harness.query_by_label("Loading...").is_none());
        for (label, value) in summary.counters() {
            assert!(harness.query_by_label(label).is_some(), "{label} missing");
            assert!(
                harness.query_by_label(&value.to_string()).is_some(),
                "{value} missing"
            );
        }
    }
}
