use cardledger_business::api_status::ApiStatusCompute;
use cardledger_business::inventory::{InventoryCompute, PriceHistoryCompute, PriceHistoryInput};
use cardledger_business::transactions::{
    CreateTransactionCompute, CreateTransactionInput, DeleteTransactionsCompute,
    DeleteTransactionsInput, TransactionsCompute,
};
use cardledger_business::{ApiConfig, Route};
use cardledger_states::{StateCtx, Time};

use crate::pages::{NewTransactionForm, TransactionsPageState};

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

fn register(mut ctx: StateCtx) -> StateCtx {
    ctx.add_state(Time::default());
    ctx.add_state(Route::default());
    ctx.add_state(PriceHistoryInput::default());
    ctx.add_state(CreateTransactionInput::default());
    ctx.add_state(DeleteTransactionsInput::default());
    ctx.add_state(TransactionsPageState::default());
    ctx.add_state(NewTransactionForm::default());
    ctx.record_compute(InventoryCompute::default());
    ctx.record_compute(PriceHistoryCompute::default());
    ctx.record_compute(TransactionsCompute::default());
    ctx.record_compute(CreateTransactionCompute::default());
    ctx.record_compute(DeleteTransactionsCompute::default());
    ctx.record_compute(ApiStatusCompute::default());
    ctx
}

impl Default for State {
    fn default() -> Self {
        let mut ctx = StateCtx::new();
        ctx.add_state(ApiConfig::default());
        Self { ctx: register(ctx) }
    }
}

impl State {
    /// State wired against an arbitrary backend, used by tests and the web
    /// entry point.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut ctx = StateCtx::new();
        ctx.add_state(ApiConfig::new(base_url));
        Self { ctx: register(ctx) }
    }
}
