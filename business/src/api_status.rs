//! Backend availability probe shown in the top bar.
//!
//! The app dispatches [`CheckApiStatusCommand`] when
//! [`ApiStatusCompute::should_check`] says a probe is due; the command
//! stamps `last_checked` from the virtual clock up front so a slow probe is
//! not re-dispatched every frame while in flight.

use std::any::Any;

use cardledger_states::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater, SnapshotClone, State,
    Time, Updater, assign_impl, state_assign_impl,
};
use chrono::{DateTime, Duration, Utc};

use crate::ApiConfig;
use crate::api;

/// Minutes between health probes.
const CHECK_INTERVAL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiAvailability {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct ApiStatusCompute {
    pub availability: ApiAvailability,

    /// Version reported by the service's `x-service-version` header.
    pub service_version: Option<String>,

    /// Virtual-clock instant of the latest probe (stamped at dispatch).
    pub last_checked: Option<DateTime<Utc>>,

    pub last_error: Option<String>,
}

impl ApiStatusCompute {
    /// True when the next probe is due.
    pub fn should_check(&self, now: DateTime<Utc>) -> bool {
        match self.last_checked {
            None => true,
            Some(checked_at) => {
                now.signed_duration_since(checked_at)
                    >= Duration::minutes(CHECK_INTERVAL_MINUTES)
            }
        }
    }
}

impl SnapshotClone for ApiStatusCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for ApiStatusCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op; side effects must not run inside a Compute.
        // Dispatch `CheckApiStatusCommand` to update this cache.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl State for ApiStatusCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Probes `GET {api}/is-health` and records the outcome.
#[derive(Default, Debug)]
pub struct CheckApiStatusCommand;

impl Command for CheckApiStatusCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let config = snap.state::<ApiConfig>().clone();
        let now = *snap.state::<Time>().as_ref();
        let previous = snap.compute::<ApiStatusCompute>().clone();

        Box::pin(async move {
            // Stamp the probe instant immediately so the app's interval
            // gating holds while the request is in flight.
            updater.set(ApiStatusCompute {
                last_checked: Some(now),
                ..previous.clone()
            });

            match api::check_health(config.api_url().as_str()).await {
                Ok(service_version) => {
                    updater.set(ApiStatusCompute {
                        availability: ApiAvailability::Available,
                        service_version,
                        last_checked: Some(now),
                        last_error: None,
                    });
                }
                Err(err) => {
                    log::error!("health check failed: {err}");
                    updater.set(ApiStatusCompute {
                        availability: ApiAvailability::Unavailable,
                        service_version: previous.service_version,
                        last_checked: Some(now),
                        last_error: Some(err.to_string()),
                    });
                }
            }
        })
    }
}
