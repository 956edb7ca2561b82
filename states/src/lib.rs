//! Reactive state registry for the cardledger UI.
//!
//! States hold caller-owned data, computes hold derived or command-updated
//! caches, and commands run async work on a Tokio runtime, publishing
//! results back over a channel that the UI thread drains once per frame.

mod command;
mod compute;
mod ctx;
mod runtime;
mod state;
mod time;

pub use command::{Command, CommandSnapshot};
pub use compute::{Compute, ComputeDeps, Dep, SnapshotClone, assign_impl};
pub use ctx::StateCtx;
pub use runtime::{LatestOnlyUpdater, StateRuntime, Updater};
pub use state::{State, state_assign_impl};
pub use time::Time;

#[cfg(test)]
mod state_ctx_tests {
    use std::any::Any;
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
            Some(Box::new(self.clone()))
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    /// Command-updated cache: no deps, no-op body.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct EchoCompute {
        value: Option<i32>,
    }

    impl SnapshotClone for EchoCompute {
        fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(self.clone()))
        }
    }

    impl Compute for EchoCompute {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn deps(&self) -> ComputeDeps {
            const STATE_IDS: [std::any::TypeId; 0] = [];
            const COMPUTE_IDS: [std::any::TypeId; 0] = [];
            (&STATE_IDS, &COMPUTE_IDS)
        }

        fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    /// Derived compute: doubles `Counter` on every `run_computed` pass.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct DoubledCompute {
        value: i32,
    }

    impl SnapshotClone for DoubledCompute {
        fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(self.clone()))
        }
    }

    impl Compute for DoubledCompute {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn deps(&self) -> ComputeDeps {
            const STATE_IDS: [std::any::TypeId; 0] = [];
            const COMPUTE_IDS: [std::any::TypeId; 0] = [];
            (&STATE_IDS, &COMPUTE_IDS)
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            if let Some(counter) = deps.state::<Counter>() {
                let doubled = counter.value * 2;
                if doubled != self.value {
                    updater.set(Self { value: doubled });
                }
            }
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    #[derive(Debug, Default)]
    struct EchoCommand;

    impl Command for EchoCommand {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: LatestOnlyUpdater,
            _cancel: tokio_util::sync::CancellationToken,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
            let counter = snap.state::<Counter>().clone();
            Box::pin(async move {
                updater.set(EchoCompute {
                    value: Some(counter.value),
                });
            })
        }
    }

    fn test_ctx() -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.record_compute(EchoCompute::default());
        ctx.record_compute(DoubledCompute::default());
        ctx
    }

    #[test]
    fn state_roundtrip() {
        let mut ctx = test_ctx();
        assert_eq!(ctx.state::<Counter>().value, 0);

        ctx.update::<Counter>(|counter| counter.value = 7);
        assert_eq!(ctx.state::<Counter>().value, 7);

        ctx.state_mut::<Counter>().value += 1;
        assert_eq!(ctx.state::<Counter>().value, 8);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn missing_state_panics() {
        let ctx = StateCtx::new();
        let _ = ctx.state::<Counter>();
    }

    #[test]
    fn cached_reads_registered_computes() {
        let mut ctx = test_ctx();
        assert_eq!(ctx.cached::<EchoCompute>(), Some(&EchoCompute::default()));
        assert_eq!(ctx.cached::<DoubledCompute>().map(|c| c.value), Some(0));

        ctx.sync_computes();
        assert_eq!(ctx.cached::<EchoCompute>(), Some(&EchoCompute::default()));
    }

    #[test]
    fn run_computed_refreshes_derived_values() {
        let mut ctx = test_ctx();
        ctx.update::<Counter>(|counter| counter.value = 21);

        ctx.run_computed();
        ctx.sync_computes();

        assert_eq!(ctx.cached::<DoubledCompute>().map(|c| c.value), Some(42));
    }

    #[test]
    fn dispatch_publishes_through_sync() {
        let mut ctx = test_ctx();
        ctx.update::<Counter>(|counter| counter.value = 5);
        ctx.dispatch::<EchoCommand>();

        let mut echoed = None;
        for _ in 0..100 {
            ctx.sync_computes();
            echoed = ctx.cached::<EchoCompute>().and_then(|c| c.value);
            if echoed.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(echoed, Some(5), "command result never arrived");
    }

    #[test]
    fn later_updates_win() {
        let mut ctx = test_ctx();
        ctx.update::<Counter>(|counter| counter.value = 1);
        ctx.dispatch::<EchoCommand>();
        std::thread::sleep(Duration::from_millis(50));
        ctx.update::<Counter>(|counter| counter.value = 2);
        ctx.dispatch::<EchoCommand>();

        let mut last = None;
        for _ in 0..100 {
            ctx.sync_computes();
            last = ctx.cached::<EchoCompute>().and_then(|c| c.value);
            if last == Some(2) {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(last, Some(2));
    }

    #[test]
    fn time_state_holds_virtual_clock() {
        let mut time = Time::default();
        let instant = chrono::DateTime::parse_from_rfc3339("2026-01-15T12:00:00Z")
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap();
        *time.as_mut() = instant;
        assert_eq!(*time.as_ref(), instant);
    }
}
