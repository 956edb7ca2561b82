use std::any::{TypeId, type_name};
use std::collections::HashMap;

use crate::command::{Command, CommandSnapshot};
use crate::compute::{Compute, Dep};
use crate::runtime::StateRuntime;
use crate::state::State;

/// Registry of states and computes plus the command runtime.
///
/// One ctx is owned by the application state and lives on the UI thread.
/// The per-frame protocol is: [`StateCtx::sync_computes`] first (apply
/// pending command results), render (read states/caches, collect intents,
/// [`StateCtx::dispatch`]), then [`StateCtx::run_computed`] last.
pub struct StateCtx {
    runtime: StateRuntime,
    states: HashMap<TypeId, Box<dyn State>>,
    computes: HashMap<TypeId, Box<dyn Compute>>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        Self {
            runtime: StateRuntime::new(),
            states: HashMap::new(),
            computes: HashMap::new(),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(TypeId::of::<T>(), Box::new(state));
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        self.computes.insert(TypeId::of::<T>(), Box::new(compute));
    }

    /// Panics when the state was never added; registration happens once at
    /// startup, so a miss is a wiring bug.
    pub fn state<T: State>(&self) -> &T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("state {} is not registered", type_name::<T>()))
    }

    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.states
            .get_mut(&TypeId::of::<T>())
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("state {} is not registered", type_name::<T>()))
    }

    /// Mutate a state in place.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// Latest value of a registered compute, if any.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|compute| compute.as_any().downcast_ref::<T>())
    }

    /// Dispatch a command on the async runtime.
    ///
    /// The command reads a clone-snapshot of the registry, so the UI thread
    /// never blocks and never shares references with the command.
    pub fn dispatch<C: Command>(&self) {
        let snap = self.snapshot();
        let updater = self.runtime.latest_only_updater();
        let cancel = self.runtime.child_token();
        let fut = C::default().run(snap, updater, cancel);
        self.runtime.spawn(fut);
    }

    fn snapshot(&self) -> CommandSnapshot {
        let states = self
            .states
            .iter()
            .filter_map(|(type_id, state)| state.snapshot().map(|boxed| (*type_id, boxed)))
            .collect();
        let computes = self
            .computes
            .iter()
            .filter_map(|(type_id, compute)| compute.clone_boxed().map(|boxed| (*type_id, boxed)))
            .collect();
        CommandSnapshot::new(states, computes)
    }

    /// Apply pending command results. Call at the start of every frame.
    pub fn sync_computes(&mut self) {
        while let Some(update) = self.runtime.try_recv_update() {
            match self.computes.get_mut(&update.type_id) {
                Some(compute) => compute.assign_box(update.value),
                None => log::warn!("compute update for unregistered type {:?}", update.type_id),
            }
        }
    }

    /// Run every registered compute body. Call at the end of every frame.
    ///
    /// Command-updated caches have no-op bodies, so this is cheap.
    pub fn run_computed(&self) {
        for compute in self.computes.values() {
            let deps = Dep::new(&self.states, &self.computes);
            compute.compute(deps, self.runtime.updater());
        }
    }

    /// Cancel in-flight commands. Further dispatches still run; their child
    /// tokens start out cancelled.
    pub fn shutdown(&self) {
        self.runtime.shutdown();
    }
}
