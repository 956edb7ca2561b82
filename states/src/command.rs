use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::compute::Compute;
use crate::runtime::LatestOnlyUpdater;
use crate::state::State;

/// Cloned view of the registry taken at dispatch time.
///
/// Only states overriding [`State::snapshot`] and computes whose
/// [`crate::SnapshotClone::clone_boxed`] returns `Some` are present.
#[derive(Default)]
pub struct CommandSnapshot {
    states: HashMap<TypeId, Box<dyn Any + Send>>,
    computes: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub(crate) fn new(
        states: HashMap<TypeId, Box<dyn Any + Send>>,
        computes: HashMap<TypeId, Box<dyn Any + Send>>,
    ) -> Self {
        Self { states, computes }
    }

    /// Panics when the state was not snapshotted; that is a wiring bug the
    /// dispatching code must fix, not a runtime condition.
    pub fn state<T: State>(&self) -> &T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .unwrap_or_else(|| panic!("state snapshot for {} is missing", type_name::<T>()))
    }

    pub fn compute<T: Compute>(&self) -> &T {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .unwrap_or_else(|| panic!("compute snapshot for {} is missing", type_name::<T>()))
    }
}

/// A manually dispatched unit of async work.
///
/// Commands are constructed through `Default` by
/// [`crate::StateCtx::dispatch`], read their inputs from the snapshot and
/// publish results through the updater. They must not block the caller.
pub trait Command: Default {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}
