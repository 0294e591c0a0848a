//! Dashboard command: sign in, print the summary, sign out.

use anyhow::{Context as _, Result};
use inquire::{Password, Text};
use sadtime_business::{
    CheckSessionCommand, FetchSummaryCommand, LoginCommand, LoginCompute, LoginInput,
    LoginStatus, LogoutCommand, SessionCompute, Summary, SummaryCompute, UserRef,
};
use sadtime_states::StateCtx;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{error, info, instrument, warn};

use crate::context::flush_and_await;
use crate::output::Output;

/// Environment variable that supplies the password without prompting.
pub const PASSWORD_ENV: &str = "SADTIME_PASSWORD";

#[derive(Tabled)]
struct CounterRow {
    #[tabled(rename = "Metric")]
    label: &'static str,
    #[tabled(rename = "Value")]
    value: u64,
}

fn summary_table(summary: &Summary) -> String {
    let rows = summary
        .counters()
        .map(|(label, value)| CounterRow { label, value });
    Table::new(rows).with(Style::rounded()).to_string()
}

fn prompt_credentials(username: Option<String>) -> Result<(String, String)> {
    let username = match username {
        Some(username) => username,
        None => Text::new("Username:")
            .prompt()
            .context("Failed to read username")?,
    };

    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => Password::new("Password:")
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?,
    };

    Ok((username, password))
}

/// Runs [`LoginCommand`] with the given credentials.
///
/// Returns the signed-in user, or the message the login form would show.
#[instrument(skip_all, name = "login")]
async fn login(ctx: &mut StateCtx, username: String, password: String) -> Result<UserRef, String> {
    ctx.update::<LoginInput>(|input| *input = LoginInput::new(username, password));
    ctx.enqueue_command::<LoginCommand>();
    flush_and_await(ctx).await;
    ctx.update::<LoginInput>(|input| input.password.clear());

    match &ctx.compute::<LoginCompute>().status {
        LoginStatus::Succeeded => ctx
            .compute::<SessionCompute>()
            .user()
            .cloned()
            .ok_or_else(|| "Login did not complete".to_string()),
        LoginStatus::Failed(message) => Err(message.clone()),
        LoginStatus::Idle | LoginStatus::Pending => Err("Login did not complete".to_string()),
    }
}

#[instrument(skip_all, name = "fetch_summary")]
async fn fetch_summary(ctx: &mut StateCtx) -> Option<Summary> {
    let mounted = ctx.compute::<SummaryCompute>().remounted();
    ctx.record_compute(mounted);
    ctx.enqueue_command::<FetchSummaryCommand>();
    flush_and_await(ctx).await;
    ctx.compute::<SummaryCompute>().summary
}

#[instrument(skip_all, name = "dashboard")]
pub async fn run_dashboard(mut ctx: StateCtx, username: Option<String>) -> Result<()> {
    let out = Output::new();

    ctx.enqueue_command::<CheckSessionCommand>();
    flush_and_await(&mut ctx).await;

    let user = match ctx.compute::<SessionCompute>().user().cloned() {
        Some(user) => user,
        None => {
            let (username, password) = prompt_credentials(username)?;
            info!(username = %username, "Attempting login");

            match login(&mut ctx, username, password).await {
                Ok(user) => user,
                Err(message) => {
                    error!("Login failed: {message}");
                    out.error(format!("Login failed: {message}"));
                    ctx.shutdown().await;
                    std::process::exit(1);
                }
            }
        }
    };

    out.newline();
    out.header("SADTIME Dashboard");
    out.print(format!("Welcome, {}", user.username));
    out.newline();

    match fetch_summary(&mut ctx).await {
        Some(summary) => out.print(summary_table(&summary)),
        None => {
            warn!("Summary fetch failed");
            out.warning("Could not load the analytics summary");
        }
    }

    ctx.enqueue_command::<LogoutCommand>();
    flush_and_await(&mut ctx).await;
    out.newline();
    out.success("Logged out");

    ctx.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sadtime_business::BusinessConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::build_state_ctx;

    fn summary() -> Summary {
        Summary {
            total_events: 120,
            events_last_24h: 5,
            events_last_7d: 40,
            total_indicators: 12,
            total_techniques_used: 3,
        }
    }

    #[test]
    fn test_summary_table_lists_every_counter() {
        let table = summary_table(&summary());
        for (label, value) in summary().counters() {
            assert!(table.contains(label), "{label} missing from\n{table}");
            assert!(table.contains(&value.to_string()));
        }
        assert!(table.contains("Metric"));
    }

    #[tokio::test]
    async fn test_login_returns_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "username": "analyst", "is_staff": true }
            })))
            .mount(&server)
            .await;

        let mut ctx = build_state_ctx(BusinessConfig::new(server.uri()));
        let user = login(&mut ctx, "analyst".into(), "hunter2".into())
            .await
            .expect("login should succeed");

        assert_eq!(user.username, "analyst");
        assert!(user.is_staff);
        assert!(ctx.state::<LoginInput>().password.is_empty());
    }

    #[tokio::test]
    async fn test_login_failure_returns_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login/"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let mut ctx = build_state_ctx(BusinessConfig::new(server.uri()));
        let err = login(&mut ctx, "analyst".into(), "wrong".into())
            .await
            .expect_err("login should fail");

        assert_eq!(err, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_fetch_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/summary/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_events": 120,
                "events_last_24h": 5,
                "events_last_7d": 40,
                "total_indicators": 12,
                "total_techniques_used": 3
            })))
            .mount(&server)
            .await;

        let mut ctx = build_state_ctx(BusinessConfig::new(server.uri()));
        assert_eq!(fetch_summary(&mut ctx).await, Some(summary()));
    }

    #[tokio::test]
    async fn test_fetch_summary_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/summary/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut ctx = build_state_ctx(BusinessConfig::new(server.uri()));
        assert_eq!(fetch_summary(&mut ctx).await, None);
    }
}
