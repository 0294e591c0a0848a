//! State container shared by the SADTIME front ends.
//!
//! - [`State`]: inputs edited synchronously by the front end.
//! - [`Compute`]: outputs replaced asynchronously through an [`Updater`].
//! - [`Command`]: explicitly dispatched side effects that read a [`CommandSnapshot`].
//!
//! All of them live in a single [`StateCtx`] owned by the front end.

mod basic_state;
mod command;
mod compute;
mod ctx;
mod runtime;
mod snapshot;
mod state;

pub use basic_state::Time;
pub use command::{Command, CommandFuture};
pub use compute::Compute;
pub use ctx::StateCtx;
pub use runtime::{StateRuntime, Updater};
pub use snapshot::CommandSnapshot;
pub use state::{SnapshotClone, State};
