use std::time::Duration;

use egui_kittest::Harness;
use sadtime_ui::SadtimeApp;
use sadtime_ui::state::State;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Frames to step before a wait gives up.
const MAX_FRAMES: usize = 100;

pub struct TestCtx<'a, T = SadtimeApp> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    #[allow(unused)]
    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }
}

impl TestCtx<'static, SadtimeApp> {
    /// App wired to `mock_server`; mount every mock the first frames need before calling.
    pub fn new_app(mock_server: MockServer) -> Self {
        let state = State::test(mock_server.uri());
        let app = SadtimeApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    /// Steps frames until `done` holds, giving command tasks time to run in between.
    pub async fn step_until(&mut self, done: impl Fn(&Harness<'static, SadtimeApp>) -> bool) -> bool {
        for _ in 0..MAX_FRAMES {
            self.harness.step();
            if done(&self.harness) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

/// Backend with a healthy `/health/` and the given `/auth/me/` body.
pub async fn mock_backend(me: Value) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me))
        .mount(&mock_server)
        .await;

    mock_server
}

#[allow(unused)]
pub fn signed_out() -> Value {
    json!({ "authenticated": false })
}

#[allow(unused)]
pub fn signed_in(username: &str) -> Value {
    json!({ "authenticated": true, "user": { "username": username, "is_staff": false } })
}

#[allow(unused)]
pub fn summary_body() -> Value {
    json!({
        "total_events": 120,
        "events_last_24h": 5,
        "events_last_7d": 40,
        "total_indicators": 12,
        "total_techniques_used": 3
    })
}
