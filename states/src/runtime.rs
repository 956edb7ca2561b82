use std::any::{Any, TypeId};
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

/// One pending compute replacement, keyed by the compute's concrete type.
pub(crate) struct ComputeUpdate {
    pub(crate) type_id: TypeId,
    pub(crate) value: Box<dyn Any + Send>,
}

/// Publishes compute values from [`crate::Compute::compute`] bodies.
#[derive(Clone)]
pub struct Updater {
    tx: flume::Sender<ComputeUpdate>,
}

impl Updater {
    pub fn set<T: crate::Compute + Send>(&self, value: T) {
        send_update(&self.tx, value);
    }
}

/// Publishes compute values from dispatched commands.
///
/// Updates are applied in publish order on the next
/// [`crate::StateCtx::sync_computes`], so when several land between two
/// frames the latest one wins.
#[derive(Clone)]
pub struct LatestOnlyUpdater {
    tx: flume::Sender<ComputeUpdate>,
}

impl LatestOnlyUpdater {
    pub fn set<T: crate::Compute + Send>(&self, value: T) {
        send_update(&self.tx, value);
    }
}

fn send_update<T: crate::Compute + Send>(tx: &flume::Sender<ComputeUpdate>, value: T) {
    let update = ComputeUpdate {
        type_id: TypeId::of::<T>(),
        value: Box::new(value),
    };
    // The receiver only disappears when the ctx is being torn down; late
    // publishes from in-flight commands are dropped on purpose.
    if tx.send(update).is_err() {
        log::debug!(
            "compute update for {} dropped after shutdown",
            std::any::type_name::<T>()
        );
    }
}

/// Owns the update channel and the cancellation root for dispatched commands.
pub struct StateRuntime {
    update_tx: flume::Sender<ComputeUpdate>,
    update_rx: flume::Receiver<ComputeUpdate>,
    cancel: CancellationToken,
}

impl Default for StateRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRuntime {
    pub fn new() -> Self {
        let (update_tx, update_rx) = flume::unbounded();
        Self {
            update_tx,
            update_rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn updater(&self) -> Updater {
        Updater {
            tx: self.update_tx.clone(),
        }
    }

    pub fn latest_only_updater(&self) -> LatestOnlyUpdater {
        LatestOnlyUpdater {
            tx: self.update_tx.clone(),
        }
    }

    pub(crate) fn try_recv_update(&self) -> Option<ComputeUpdate> {
        self.update_rx.try_recv().ok()
    }

    /// Child token cancelled when the runtime shuts down.
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Spawn a command future.
    ///
    /// On native targets this prefers the ambient Tokio runtime (so
    /// `#[tokio::test]` drives commands on its own scheduler) and falls back
    /// to a process-wide background runtime otherwise.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn(&self, fut: Pin<Box<dyn Future<Output = ()> + Send>>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(fut);
            }
            Err(_) => {
                command_runtime().spawn(fut);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn spawn(&self, fut: Pin<Box<dyn Future<Output = ()> + Send>>) {
        wasm_bindgen_futures::spawn_local(fut);
    }
}

impl Drop for StateRuntime {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn command_runtime() -> &'static tokio::runtime::Runtime {
    static COMMAND_RUNTIME: std::sync::OnceLock<tokio::runtime::Runtime> =
        std::sync::OnceLock::new();
    COMMAND_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("state-commands")
            .enable_all()
            .build()
            .expect("failed to build the command runtime")
    })
}
