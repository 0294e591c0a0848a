use std::{future::Future, pin::Pin};

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

/// Future returned by [`Command::run`].
pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A manual-only side effect.
///
/// Commands never run implicitly: the owner records them once with
/// [`StateCtx::record_command`] and dispatches them explicitly. `run` receives a
/// snapshot taken at flush time, so the returned future owns everything it reads and
/// reports back only through the [`Updater`].
///
/// [`StateCtx::record_command`]: crate::StateCtx::record_command
pub trait Command: Send + Sync + 'static {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken)
    -> CommandFuture;
}
