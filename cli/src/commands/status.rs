//! Status command: backend health and session in one go.

use anyhow::Result;
use sadtime_business::{
    APIAvailability, ApiStatus, BusinessConfig, CheckSessionCommand, HealthCheckCommand,
    SessionCompute,
};
use sadtime_states::StateCtx;
use tracing::instrument;

use crate::context::flush_and_await;
use crate::output::Output;

/// One line describing backend health, and whether it is healthy.
fn describe_health(status: &ApiStatus) -> (bool, String) {
    match status.api_availability() {
        APIAvailability::Available(time) => (
            true,
            format!("API healthy (checked at {})", time.format("%H:%M:%S")),
        ),
        APIAvailability::Unavailable((_, err)) => (false, format!("API unavailable: {err}")),
        APIAvailability::Unknown => (false, "API status unknown".to_string()),
    }
}

fn describe_session(session: &SessionCompute) -> String {
    match session.user() {
        Some(user) if user.is_staff => format!("Signed in as {} (staff)", user.username),
        Some(user) => format!("Signed in as {}", user.username),
        None => "Not signed in".to_string(),
    }
}

#[instrument(skip_all, name = "status")]
pub async fn run_status(mut ctx: StateCtx) -> Result<()> {
    let out = Output::new();

    out.header("SADTIME status");
    out.labeled("Backend", ctx.state::<BusinessConfig>().api_url());

    ctx.enqueue_command::<HealthCheckCommand>();
    ctx.enqueue_command::<CheckSessionCommand>();
    flush_and_await(&mut ctx).await;

    match describe_health(ctx.compute::<ApiStatus>()) {
        (true, line) => out.success(line),
        (false, line) => out.error(line),
    }
    out.info(describe_session(ctx.compute::<SessionCompute>()));

    ctx.shutdown().await;
    Ok(())
}
