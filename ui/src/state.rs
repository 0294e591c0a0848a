use chrono::Utc;
use log::{info, warn};
use sadtime_business::{
    ApiStatus, BusinessConfig, CheckSessionCommand, FetchSummaryCommand, HealthCheckCommand,
    LoginInput, Route, SessionCompute, SummaryCompute,
};
use sadtime_states::{StateCtx, Time};

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl Default for State {
    fn default() -> Self {
        let config = BusinessConfig::from_env().unwrap_or_else(|err| {
            warn!("{err}, falling back to the default backend");
            BusinessConfig::default()
        });
        Self::new(config)
    }
}

impl State {
    /// Registers everything and queues the initial session check.
    ///
    /// Nothing is sent until the first frame flushes the queue.
    pub fn new(config: BusinessConfig) -> Self {
        info!("Using backend at {}", config.api_url());

        let mut ctx = StateCtx::new();
        sadtime_business::register(&mut ctx, config);
        ctx.enqueue_command::<CheckSessionCommand>();

        Self { ctx }
    }

    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url))
    }

    /// The route to render, as last resolved by [`Self::begin_frame`].
    pub fn route(&self) -> Route {
        *self.ctx.state::<Route>()
    }

    /// Applies finished command results and reacts to route changes.
    ///
    /// Entering the dashboard mounts the summary view: the previous snapshot is dropped and a
    /// single fetch is queued. The password is wiped at the same time.
    pub fn begin_frame(&mut self) {
        self.ctx.sync_computes();
        self.ctx.update::<Time>(|time| *time.as_mut() = Utc::now());

        let route = Route::from(&self.ctx.compute::<SessionCompute>().status);
        if route != self.route() {
            info!("Route changed: {:?} -> {route:?}", self.route());
            if route == Route::Dashboard {
                let mounted = self.ctx.compute::<SummaryCompute>().remounted();
                self.ctx.record_compute(mounted);
                self.ctx.enqueue_command::<FetchSummaryCommand>();
                self.ctx.update::<LoginInput>(|input| input.password.clear());
            }
            self.ctx.update::<Route>(|current| *current = route);
        }

        let now = *self.ctx.state::<Time>().as_ref();
        if self.ctx.compute::<ApiStatus>().should_refresh(now) {
            self.ctx.enqueue_command::<HealthCheckCommand>();
        }
    }

    /// Starts every command queued during this frame.
    pub fn end_frame(&mut self) {
        self.ctx.flush_commands();
    }
}
