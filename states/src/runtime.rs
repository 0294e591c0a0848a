use std::any::{Any, TypeId, type_name};

use flume::{Receiver, Sender};
use log::warn;

use crate::Compute;

/// A pending replacement of one compute, applied by [`StateCtx::sync_computes`].
///
/// [`StateCtx::sync_computes`]: crate::StateCtx::sync_computes
pub(crate) type Assign = Box<dyn FnOnce(&mut dyn Any) + Send>;

type Update = (TypeId, Assign);

/// Channel between background work and the thread that owns the [`StateCtx`].
///
/// [`StateCtx`]: crate::StateCtx
pub struct StateRuntime {
    send: Sender<Update>,
    recv: Receiver<Update>,
}

impl Default for StateRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRuntime {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv }
    }

    pub fn updater(&self) -> Updater {
        Updater {
            send: self.send.clone(),
        }
    }

    pub(crate) fn drain(&self) -> impl Iterator<Item = Update> + '_ {
        self.recv.try_iter()
    }

    pub fn pending(&self) -> usize {
        self.recv.len()
    }
}

impl std::fmt::Debug for StateRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRuntime")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Write handle for computes, cheap to clone and safe to move into futures.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    /// Queues `value` to replace the registered compute of the same type.
    pub fn set<T: Compute>(&self, value: T) {
        let assign: Assign = Box::new(move |slot: &mut dyn Any| {
            if let Some(target) = slot.downcast_mut::<T>() {
                *target = value;
            }
        });
        if self.send.send((TypeId::of::<T>(), assign)).is_err() {
            warn!(
                "Updater: state context dropped, discarding update for {}",
                type_name::<T>()
            );
        }
    }

    /// Queues an in-place edit of the registered compute, applied against whatever value it
    /// holds at sync time.
    pub fn update<T: Compute>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let assign: Assign = Box::new(move |slot: &mut dyn Any| {
            if let Some(target) = slot.downcast_mut::<T>() {
                f(target);
            }
        });
        if self.send.send((TypeId::of::<T>(), assign)).is_err() {
            warn!(
                "Updater: state context dropped, discarding update for {}",
                type_name::<T>()
            );
        }
    }
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater").finish_non_exhaustive()
    }
}
