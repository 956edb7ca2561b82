use std::any::Any;

/// A piece of application state registered in a [`crate::StateCtx`].
///
/// States are owned by the UI thread. Commands never touch them directly;
/// they read cloned snapshots (see [`State::snapshot`]) and publish results
/// into computes.
pub trait State: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Clone this state for a command snapshot.
    ///
    /// The default returns `None`, which leaves the state out of snapshots.
    /// Override it for every state a command reads.
    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        None
    }

    /// Replace `self` with a payload of the same concrete type.
    ///
    /// Implementations should delegate to [`state_assign_impl`].
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for [`State`] impls.
///
/// A mismatched payload is a wiring bug, not a user error; it is logged and
/// the current value is kept.
pub fn state_assign_impl<T: State + Sized>(dst: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(new_self) => *dst = *new_self,
        Err(_) => log::error!(
            "state assign: unexpected payload for {}",
            std::any::type_name::<T>()
        ),
    }
}
