use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, State};

#[derive(Default)]
struct Snapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl Snapshot {
    fn insert_cloned(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    fn get<T: 'static>(&self) -> Option<&T> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }
}

/// Owned copies of the states and computes a command may read.
///
/// Taken when the command is flushed, so values edited afterwards do not leak into a
/// running command.
#[derive(Default)]
pub struct CommandSnapshot {
    states: Snapshot,
    computes: Snapshot,
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_state(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.states.insert_cloned(id, value);
    }

    pub fn insert_compute(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.computes.insert_cloned(id, value);
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        self.states.get::<T>()
    }

    pub fn try_compute<T: Compute>(&self) -> Option<&T> {
        self.computes.get::<T>()
    }

    /// # Panics
    /// Panics if `T` was not registered or does not take part in snapshots.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` was not registered or does not take part in snapshots.
    pub fn compute<T: Compute>(&self) -> &T {
        self.try_compute::<T>()
            .unwrap_or_else(|| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }
}

impl std::fmt::Debug for CommandSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSnapshot")
            .field("states", &self.states.inner.len())
            .field("computes", &self.computes.inner.len())
            .finish()
    }
}
