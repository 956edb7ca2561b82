//! Transaction ledger cache and the write-path commands (create, bulk
//! delete) with their status caches.
//!
//! Successful writes also refresh [`TransactionsCompute`] so the ledger
//! table never shows stale rows after an action.

use std::any::Any;

use cardledger_states::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater, SnapshotClone, State,
    Updater, assign_impl, state_assign_impl,
};

use crate::ApiConfig;
use crate::api;
use crate::model::{CreateTransactionRequest, Transaction};

/// Status/result of the transactions list call.
#[derive(Debug, Clone, Default)]
pub enum TransactionsResult {
    #[default]
    Idle,

    Loading,

    Loaded(Vec<Transaction>),

    Error(String),
}

/// Compute-shaped cache for the transaction ledger.
#[derive(Debug, Clone, Default)]
pub struct TransactionsCompute {
    pub result: TransactionsResult,
}

impl TransactionsCompute {
    pub fn is_idle(&self) -> bool {
        matches!(self.result, TransactionsResult::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.result, TransactionsResult::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            TransactionsResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        match &self.result {
            TransactionsResult::Loaded(transactions) => Some(transactions.as_slice()),
            _ => None,
        }
    }

    pub fn find(&self, id: i64) -> Option<&Transaction> {
        self.transactions()?.iter().find(|tx| tx.id == id)
    }
}

impl SnapshotClone for TransactionsCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for TransactionsCompute {
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
        // Dispatch `RefreshTransactionsCommand` to update this cache.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl State for TransactionsCompute {
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

/// Manual-only command that refreshes the transaction ledger.
#[derive(Default, Debug)]
pub struct RefreshTransactionsCommand;

impl Command for RefreshTransactionsCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let config = snap.state::<ApiConfig>().clone();

        Box::pin(async move {
            updater.set(TransactionsCompute {
                result: TransactionsResult::Loading,
            });
            refresh_transactions(&updater, config.api_url().as_str()).await;
        })
    }
}

/// Shared list refresh used by the refresh command and after writes.
async fn refresh_transactions(updater: &LatestOnlyUpdater, api_base_url: &str) {
    match api::list_transactions(api_base_url).await {
        Ok(transactions) => {
            updater.set(TransactionsCompute {
                result: TransactionsResult::Loaded(transactions),
            });
        }
        Err(err) => {
            log::error!("transactions refresh failed: {err}");
            updater.set(TransactionsCompute {
                result: TransactionsResult::Error(err.to_string()),
            });
        }
    }
}

/// Draft submitted by the new-transaction form.
#[derive(Debug, Clone, Default)]
pub struct CreateTransactionInput {
    pub request: Option<CreateTransactionRequest>,
}

impl State for CreateTransactionInput {
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

/// Status/result of submitting a new transaction.
#[derive(Debug, Clone, Default)]
pub enum CreateTransactionResult {
    #[default]
    Idle,

    Saving,

    /// The stored transaction as returned by the service.
    Created(Transaction),

    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct CreateTransactionCompute {
    pub result: CreateTransactionResult,
}

impl CreateTransactionCompute {
    pub fn is_saving(&self) -> bool {
        matches!(self.result, CreateTransactionResult::Saving)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            CreateTransactionResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn created(&self) -> Option<&Transaction> {
        match &self.result {
            CreateTransactionResult::Created(tx) => Some(tx),
            _ => None,
        }
    }
}

impl SnapshotClone for CreateTransactionCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for CreateTransactionCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op; dispatch `SubmitTransactionCommand`.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl State for CreateTransactionCompute {
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

/// Submits the draft in [`CreateTransactionInput`].
#[derive(Default, Debug)]
pub struct SubmitTransactionCommand;

impl Command for SubmitTransactionCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let input = snap.state::<CreateTransactionInput>().clone();
        let config = snap.state::<ApiConfig>().clone();

        Box::pin(async move {
            let Some(request) = input.request else {
                updater.set(CreateTransactionCompute {
                    result: CreateTransactionResult::Error(
                        "SubmitTransactionCommand: missing draft (set CreateTransactionInput.request before dispatch)"
                            .to_owned(),
                    ),
                });
                return;
            };

            updater.set(CreateTransactionCompute {
                result: CreateTransactionResult::Saving,
            });

            let api_base_url = config.api_url();
            match api::create_transaction(api_base_url.as_str(), &request).await {
                Ok(created) => {
                    updater.set(CreateTransactionCompute {
                        result: CreateTransactionResult::Created(created),
                    });
                    refresh_transactions(&updater, api_base_url.as_str()).await;
                }
                Err(err) => {
                    log::error!("transaction create failed: {err}");
                    updater.set(CreateTransactionCompute {
                        result: CreateTransactionResult::Error(err.to_string()),
                    });
                }
            }
        })
    }
}

/// Puts the create cache back to `Idle` after the form navigates away.
#[derive(Default, Debug)]
pub struct ResetCreateTransactionCommand;

impl Command for ResetCreateTransactionCommand {
    fn run(
        &self,
        _snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        Box::pin(async move {
            updater.set(CreateTransactionCompute::default());
        })
    }
}

/// Ids selected for bulk delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteTransactionsInput {
    pub ids: Vec<i64>,
}

impl State for DeleteTransactionsInput {
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

/// Status/result of a bulk delete.
#[derive(Debug, Clone, Default)]
pub enum DeleteTransactionsResult {
    #[default]
    Idle,

    Deleting,

    /// Number of transactions the service removed.
    Deleted(u32),

    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct DeleteTransactionsCompute {
    pub result: DeleteTransactionsResult,
}

impl DeleteTransactionsCompute {
    pub fn is_deleting(&self) -> bool {
        matches!(self.result, DeleteTransactionsResult::Deleting)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            DeleteTransactionsResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn deleted(&self) -> Option<u32> {
        match self.result {
            DeleteTransactionsResult::Deleted(count) => Some(count),
            _ => None,
        }
    }
}

impl SnapshotClone for DeleteTransactionsCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for DeleteTransactionsCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Intentionally no-op; dispatch `DeleteTransactionsCommand`.
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl State for DeleteTransactionsCompute {
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

/// Bulk-deletes the ids in [`DeleteTransactionsInput`].
#[derive(Default, Debug)]
pub struct DeleteTransactionsCommand;

impl Command for DeleteTransactionsCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        let input = snap.state::<DeleteTransactionsInput>().clone();
        let config = snap.state::<ApiConfig>().clone();

        Box::pin(async move {
            if input.ids.is_empty() {
                updater.set(DeleteTransactionsCompute {
                    result: DeleteTransactionsResult::Error(
                        "DeleteTransactionsCommand: empty selection (set DeleteTransactionsInput.ids before dispatch)"
                            .to_owned(),
                    ),
                });
                return;
            }

            updater.set(DeleteTransactionsCompute {
                result: DeleteTransactionsResult::Deleting,
            });

            let api_base_url = config.api_url();
            match api::delete_transactions(api_base_url.as_str(), &input.ids).await {
                Ok(deleted) => {
                    updater.set(DeleteTransactionsCompute {
                        result: DeleteTransactionsResult::Deleted(deleted),
                    });
                    refresh_transactions(&updater, api_base_url.as_str()).await;
                }
                Err(err) => {
                    log::error!("bulk delete failed: {err}");
                    updater.set(DeleteTransactionsCompute {
                        result: DeleteTransactionsResult::Error(err.to_string()),
                    });
                }
            }
        })
    }
}

/// Puts the delete cache back to `Idle` once the page has consumed the
/// outcome.
#[derive(Default, Debug)]
pub struct ResetDeleteTransactionsCommand;

impl Command for ResetDeleteTransactionsCommand {
    fn run(
        &self,
        _snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: tokio_util::sync::CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        Box::pin(async move {
            updater.set(DeleteTransactionsCompute::default());
        })
    }
}
