use std::any::Any;

use crate::SnapshotClone;

/// An output value, such as the cached result of a network call.
///
/// Computes are only replaced through an [`Updater`], and replacements become visible
/// once the owner calls [`StateCtx::sync_computes`]. Reading a compute never triggers work.
///
/// [`Updater`]: crate::Updater
/// [`StateCtx::sync_computes`]: crate::StateCtx::sync_computes
pub trait Compute: Any + Send + SnapshotClone {}
