use std::time::Duration;

use cardledger_business::api_status::{ApiStatusCompute, CheckApiStatusCommand};
use cardledger_business::inventory::{InventoryCompute, RefreshInventoryCommand};
use cardledger_business::transactions::{
    CreateTransactionCompute, DeleteTransactionsCompute, RefreshTransactionsCommand,
    TransactionsCompute,
};
use cardledger_business::Route;
use cardledger_states::Time;

use crate::{pages, state::State, widgets};

/// Repaint cadence while a command is in flight.
const BUSY_REPAINT: Duration = Duration::from_millis(100);
/// Relaxed repaint cadence; keeps the health probe interval honest.
const IDLE_REPAINT: Duration = Duration::from_secs(1);

pub struct CardledgerApp {
    state: State,
}

impl CardledgerApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Fetches that are due this frame: the initial list load for the
    /// visible tab and the periodic health probe.
    fn dispatch_due_work(&self) {
        let ctx = &self.state.ctx;
        let route = *ctx.state::<Route>();
        let now = *ctx.state::<Time>().as_ref();

        if route.is_inventory_tab()
            && ctx
                .cached::<InventoryCompute>()
                .is_some_and(InventoryCompute::is_idle)
        {
            ctx.dispatch::<RefreshInventoryCommand>();
        }

        if route.is_transactions_tab()
            && ctx
                .cached::<TransactionsCompute>()
                .is_some_and(TransactionsCompute::is_idle)
        {
            ctx.dispatch::<RefreshTransactionsCommand>();
        }

        if ctx
            .cached::<ApiStatusCompute>()
            .is_some_and(|status| status.should_check(now))
        {
            ctx.dispatch::<CheckApiStatusCommand>();
        }
    }

    fn is_busy(&self) -> bool {
        let ctx = &self.state.ctx;
        ctx.cached::<InventoryCompute>()
            .is_some_and(InventoryCompute::is_loading)
            || ctx
                .cached::<TransactionsCompute>()
                .is_some_and(TransactionsCompute::is_loading)
            || ctx
                .cached::<CreateTransactionCompute>()
                .is_some_and(CreateTransactionCompute::is_saving)
            || ctx
                .cached::<DeleteTransactionsCompute>()
                .is_some_and(DeleteTransactionsCompute::is_deleting)
    }
}

impl eframe::App for CardledgerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sync Compute results for this frame, then advance the virtual
        // clock before anything reads it.
        self.state.ctx.sync_computes();
        let now = chrono::Utc::now();
        self.state.ctx.update::<Time>(|time| *time.as_mut() = now);

        self.dispatch_due_work();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong("Cardledger");
                ui.separator();

                let route = *self.state.ctx.state::<Route>();
                if ui
                    .selectable_label(route.is_inventory_tab(), "Inventory")
                    .clicked()
                {
                    self.state.ctx.update::<Route>(|route| *route = Route::Inventory);
                }
                if ui
                    .selectable_label(route.is_transactions_tab(), "Transactions")
                    .clicked()
                {
                    self.state
                        .ctx
                        .update::<Route>(|route| *route = Route::Transactions);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    widgets::env_version(ui);
                    ui.add_space(4.0);
                    widgets::api_status(&self.state.ctx, ui);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let route = *self.state.ctx.state::<Route>();
            match route {
                Route::Inventory => {
                    pages::inventory_page(&mut self.state, ui);
                }
                Route::ItemDetail { sku } => {
                    pages::item_detail_page(&mut self.state, sku, ui);
                }
                Route::Transactions => {
                    pages::transactions_page(&mut self.state, ui);
                }
                Route::TransactionDetail { id } => {
                    pages::transaction_detail_page(&mut self.state, id, ui);
                }
                Route::NewTransaction => {
                    pages::new_transaction_page(&mut self.state, ui);
                }
            }
        });

        // Run background jobs
        self.state.ctx.run_computed();

        ctx.request_repaint_after(if self.is_busy() {
            BUSY_REPAINT
        } else {
            IDLE_REPAINT
        });
    }
}
