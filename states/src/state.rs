use std::any::Any;

/// Produces the owned copy of a value that commands receive in their [`CommandSnapshot`].
///
/// Returning `None` keeps the value out of snapshots entirely, which is the default for
/// values no command needs to read.
///
/// [`CommandSnapshot`]: crate::CommandSnapshot
pub trait SnapshotClone {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// An input value owned by the front end.
///
/// States are written synchronously through [`StateCtx::update`] or
/// [`StateCtx::state_mut`] and are never touched by background work.
///
/// [`StateCtx::update`]: crate::StateCtx::update
/// [`StateCtx::state_mut`]: crate::StateCtx::state_mut
pub trait State: Any + Send + SnapshotClone {}
