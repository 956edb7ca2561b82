//! Inventory list and per-SKU price history caches plus their refresh
//! commands.
//!
//! The UI reads the caches via `ctx.cached::<InventoryCompute>()` /
//! `ctx.cached::<PriceHistoryCompute>()` and dispatches the commands via
//! `ctx.dispatch::<RefreshInventoryCommand>()` /
//! `ctx.dispatch::<FetchPriceHistoryCommand>()`.

use std::any::Any;

use cardledger_states::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater, SnapshotClone, State,
    Updater, assign_impl, state_assign_impl,
};
use ustr::Ustr;

use crate::ApiConfig;
use crate::api;
use crate::model::{InventoryItem, PricePoint};

/// Default price history range, in days.
pub const DEFAULT_PRICE_HISTORY_DAYS: u16 = 30;

/// Status/result of the inventory list call.
#[derive(Debug, Clone, Default)]
pub enum InventoryResult {
    /// No request has been made yet (or the cache was reset).
    #[default]
    Idle,

    /// A refresh is currently in-flight.
    Loading,

    /// The last refresh succeeded with these items.
    Loaded(Vec<InventoryItem>),

    /// The last refresh failed with this error message.
    Error(String),
}

/// Compute-shaped cache for the inventory list.
#[derive(Debug, Clone, Default)]
pub struct InventoryCompute {
    pub result: InventoryResult,
}

impl InventoryCompute {
    pub fn is_idle(&self) -> bool {
        matches!(self.result, InventoryResult::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.result, InventoryResult::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            InventoryResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[InventoryItem]> {
        match &self.result {
            InventoryResult::Loaded(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn find(&self, sku: &str) -> Option<&InventoryItem> {
        self.items()?.iter().find(|item| item.sku == sku)
    }
}

impl SnapshotClone for InventoryCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for InventoryCompute {
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
        // Dispatch `RefreshInventoryCommand` to update this cache.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl State for InventoryCompute {
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

/// Manual-only command that refreshes the inventory list.
#[derive(Default, Debug)]
pub struct RefreshInventoryCommand;

impl Command for RefreshInventoryCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let config = snap.state::<ApiConfig>().clone();

        Box::pin(async move {
            updater.set(InventoryCompute {
                result: InventoryResult::Loading,
            });

            match api::list_inventory(config.api_url().as_str()).await {
                Ok(items) => {
                    updater.set(InventoryCompute {
                        result: InventoryResult::Loaded(items),
                    });
                }
                Err(err) => {
                    log::error!("inventory refresh failed: {err}");
                    updater.set(InventoryCompute {
                        result: InventoryResult::Error(err.to_string()),
                    });
                }
            }
        })
    }
}

/// Parameters for the price history fetch.
///
/// The item page writes the SKU and range here before dispatching
/// [`FetchPriceHistoryCommand`].
#[derive(Debug, Clone)]
pub struct PriceHistoryInput {
    pub sku: Option<Ustr>,

    /// Range in days; the item page offers 7/30/90.
    pub days: u16,
}

impl Default for PriceHistoryInput {
    fn default() -> Self {
        Self {
            sku: None,
            days: DEFAULT_PRICE_HISTORY_DAYS,
        }
    }
}

impl State for PriceHistoryInput {
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

/// Status/result of the price history fetch.
#[derive(Debug, Clone, Default)]
pub enum PriceHistoryResult {
    #[default]
    Idle,

    Loading,

    /// Points for the SKU the fetch was dispatched with.
    Loaded { sku: Ustr, points: Vec<PricePoint> },

    Error(String),
}

/// Compute-shaped cache for one SKU's price history.
#[derive(Debug, Clone, Default)]
pub struct PriceHistoryCompute {
    pub result: PriceHistoryResult,
}

impl PriceHistoryCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.result, PriceHistoryResult::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            PriceHistoryResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Loaded points, only when they belong to `sku`.
    pub fn points_for(&self, sku: Ustr) -> Option<&[PricePoint]> {
        match &self.result {
            PriceHistoryResult::Loaded {
                sku: loaded_sku,
                points,
            } if *loaded_sku == sku => Some(points.as_slice()),
            _ => None,
        }
    }
}

impl SnapshotClone for PriceHistoryCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for PriceHistoryCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op; dispatch `FetchPriceHistoryCommand`.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl State for PriceHistoryCompute {
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

/// Manual-only command that fetches price history for the SKU in
/// [`PriceHistoryInput`].
#[derive(Default, Debug)]
pub struct FetchPriceHistoryCommand;

impl Command for FetchPriceHistoryCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let input = snap.state::<PriceHistoryInput>().clone();
        let config = snap.state::<ApiConfig>().clone();

        Box::pin(async move {
            let Some(sku) = input.sku else {
                updater.set(PriceHistoryCompute {
                    result: PriceHistoryResult::Error(
                        "FetchPriceHistoryCommand: missing sku (set PriceHistoryInput.sku before dispatch)"
                            .to_owned(),
                    ),
                });
                return;
            };

            updater.set(PriceHistoryCompute {
                result: PriceHistoryResult::Loading,
            });

            match api::price_history(config.api_url().as_str(), sku.as_str(), input.days).await {
                Ok(points) => {
                    updater.set(PriceHistoryCompute {
                        result: PriceHistoryResult::Loaded { sku, points },
                    });
                }
                Err(err) => {
                    log::error!("price history fetch for {sku} failed: {err}");
                    updater.set(PriceHistoryCompute {
                        result: PriceHistoryResult::Error(err.to_string()),
                    });
                }
            }
        })
    }
}
