use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use log::{debug, error, warn};
#[cfg(not(target_arch = "wasm32"))]
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::command::CommandFuture;
use crate::{Command, CommandSnapshot, Compute, State, StateRuntime, Updater};

/// Owner of every state, compute and command of one front end.
///
/// There is exactly one `StateCtx` per running front end and it is passed down explicitly;
/// nothing in this crate is global.
///
/// Commands are spawned onto the ambient tokio runtime on native targets, so
/// [`flush_commands`](Self::flush_commands) must be called from within one. On wasm they run
/// on the browser event loop.
pub struct StateCtx {
    runtime: StateRuntime,
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, Box<dyn Compute>>,
    commands: BTreeMap<TypeId, Arc<dyn Command>>,
    queue: VecDeque<TypeId>,
    cancel: CancellationToken,
    #[cfg(not(target_arch = "wasm32"))]
    tasks: JoinSet<()>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queue.len())
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        Self {
            runtime: StateRuntime::new(),
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            queue: VecDeque::new(),
            cancel: CancellationToken::new(),
            #[cfg(not(target_arch = "wasm32"))]
            tasks: JoinSet::new(),
        }
    }

    /// Registers `state`, replacing any previous value of the same type.
    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(TypeId::of::<T>(), Box::new(state));
    }

    /// Registers `compute`, replacing any previous value of the same type.
    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        self.computes.insert(TypeId::of::<T>(), Box::new(compute));
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        let boxed = self.states.get(&TypeId::of::<T>())?;
        let any: &dyn Any = &**boxed;
        any.downcast_ref::<T>()
    }

    /// # Panics
    /// Panics if `T` was never registered with [`add_state`](Self::add_state).
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` was never registered with [`add_state`](Self::add_state).
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.states
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| {
                let any: &mut dyn Any = &mut **boxed;
                any.downcast_mut::<T>()
            })
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// Edits a registered state in place.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// The last synced value of a compute, or `None` if it is not registered.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        let boxed = self.computes.get(&TypeId::of::<T>())?;
        let any: &dyn Any = &**boxed;
        any.downcast_ref::<T>()
    }

    /// # Panics
    /// Panics if `T` was never registered with [`record_compute`](Self::record_compute).
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }

    pub fn updater(&self) -> Updater {
        self.runtime.updater()
    }

    /// Applies every update received since the last call.
    ///
    /// Updates for computes that are not registered are dropped with a warning.
    pub fn sync_computes(&mut self) {
        for (id, assign) in self.runtime.drain() {
            match self.computes.get_mut(&id) {
                Some(compute) => {
                    let slot: &mut dyn Any = &mut **compute;
                    assign(slot);
                }
                None => warn!("sync_computes: dropping update for unregistered compute {id:?}"),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        while let Some(finished) = self.tasks.try_join_next() {
            if let Err(err) = finished
                && err.is_panic()
            {
                error!("sync_computes: command task panicked: {err}");
            }
        }
    }

    /// Queues a command; nothing runs until [`flush_commands`](Self::flush_commands).
    pub fn enqueue_command<T: Command>(&mut self) {
        let id = TypeId::of::<T>();
        if self.commands.contains_key(&id) {
            self.queue.push_back(id);
        } else {
            warn!(
                "enqueue_command: {} is not registered, ignoring",
                type_name::<T>()
            );
        }
    }

    /// Runs every queued command in order, each against a fresh snapshot.
    pub fn flush_commands(&mut self) {
        while let Some(id) = self.queue.pop_front() {
            let Some(command) = self.commands.get(&id).cloned() else {
                continue;
            };
            let future = command.run(self.snapshot(), self.updater(), self.cancel.child_token());
            self.spawn(future);
        }
    }

    /// Shorthand for [`enqueue_command`](Self::enqueue_command) followed by
    /// [`flush_commands`](Self::flush_commands).
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    /// Clones every state and compute that opts into snapshots.
    pub fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, state) in &self.states {
            if let Some(value) = state.clone_boxed() {
                snap.insert_state(*id, value);
            }
        }
        for (id, compute) in &self.computes {
            if let Some(value) = compute.clone_boxed() {
                snap.insert_compute(*id, value);
            }
        }
        snap
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&mut self, future: CommandFuture) {
        self.tasks.spawn(future);
        debug!("spawned command task, {} in flight", self.tasks.len());
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&mut self, future: CommandFuture) {
        wasm_bindgen_futures::spawn_local(future);
        debug!("spawned command task on the JS event loop");
    }

    /// Number of command tasks not yet reaped.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_set_mut(&mut self) -> &mut JoinSet<()> {
        &mut self.tasks
    }

    /// Cancels every running command and waits for their tasks to finish.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.tasks.abort_all();
            while self.tasks.join_next().await.is_some() {}
        }
        self.queue.clear();
    }
}
