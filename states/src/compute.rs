use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::runtime::Updater;
use crate::state::State;

/// Static dependency lists of a compute: `(state type ids, compute type ids)`.
pub type ComputeDeps = (&'static [TypeId], &'static [TypeId]);

/// Cloning hook used when building command snapshots.
pub trait SnapshotClone {
    /// Clone `self` into a boxed payload, or `None` to stay out of snapshots.
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>>;
}

/// A derived value registered in a [`crate::StateCtx`].
///
/// Most computes in this codebase are command-updated caches: their
/// [`Compute::compute`] body is a no-op and a dispatched [`crate::Command`]
/// publishes new values through the updater channel. Side effects (network,
/// file IO) must not run inside `compute`, which is executed implicitly
/// every frame.
pub trait Compute: Any + SnapshotClone {
    fn as_any(&self) -> &dyn Any;

    /// The states and computes this compute reads in [`Compute::compute`].
    fn deps(&self) -> ComputeDeps;

    /// Recompute the derived value, publishing through `updater`.
    fn compute(&self, deps: Dep<'_>, updater: Updater);

    /// Replace `self` with a payload of the same concrete type.
    ///
    /// Implementations should delegate to [`assign_impl`].
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for [`Compute`] impls.
pub fn assign_impl<T: Compute + Sized>(dst: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(new_self) => *dst = *new_self,
        Err(_) => log::error!(
            "compute assign: unexpected payload for {}",
            std::any::type_name::<T>()
        ),
    }
}

/// Read-only view of the registry handed to [`Compute::compute`].
pub struct Dep<'a> {
    states: &'a HashMap<TypeId, Box<dyn State>>,
    computes: &'a HashMap<TypeId, Box<dyn Compute>>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a HashMap<TypeId, Box<dyn State>>,
        computes: &'a HashMap<TypeId, Box<dyn Compute>>,
    ) -> Self {
        Self { states, computes }
    }

    pub fn state<T: State>(&self) -> Option<&T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|compute| compute.as_any().downcast_ref::<T>())
    }
}
