//! Business logic of the SADTIME client: session controller, analytics summary and backend
//! health, expressed as states, computes and commands for a [`StateCtx`].

mod api_status;
mod config;
pub mod http;
mod login;
mod route;
mod session;
mod summary;

pub use api_status::{APIAvailability, ApiStatus, HEALTH_CHECK_INTERVAL_MINUTES, HealthCheckCommand};
pub use config::{BusinessConfig, ConfigError, DEFAULT_API_BASE_URL};
pub use login::{
    DEFAULT_LOGIN_ERROR, ErrorResponse, LoginCommand, LoginCompute, LoginInput, LoginRequest,
    LoginResponse, LoginStatus, extract_error_message,
};
pub use route::Route;
pub use session::{
    CheckSessionCommand, LogoutCommand, MeResponse, SessionCompute, SessionStatus, UserRef,
};
pub use summary::{FetchSummaryCommand, Summary, SummaryCompute};

use sadtime_states::{StateCtx, Time};

/// Registers every state, compute and command the front ends use.
///
/// `config` decides which backend the shared [`http::HttpClient`] talks to.
pub fn register(ctx: &mut StateCtx, config: BusinessConfig) {
    ctx.add_state(config);
    ctx.add_state(http::HttpClient::new());
    ctx.add_state(Time::now());
    ctx.add_state(LoginInput::default());
    ctx.add_state(Route::default());

    ctx.record_compute(SessionCompute::default());
    ctx.record_compute(LoginCompute::default());
    ctx.record_compute(SummaryCompute::default());
    ctx.record_compute(ApiStatus::default());

    ctx.record_command(CheckSessionCommand);
    ctx.record_command(LoginCommand);
    ctx.record_command(LogoutCommand);
    ctx.record_command(FetchSummaryCommand);
    ctx.record_command(HealthCheckCommand);
}
