//! Transaction ledger: selectable table plus bulk delete.

use std::any::Any;
use std::collections::HashMap;

use cardledger_business::Route;
use cardledger_business::model::Transaction;
use cardledger_business::money::format_cents;
use cardledger_business::transactions::{
    DeleteTransactionsCommand, DeleteTransactionsCompute, DeleteTransactionsInput,
    RefreshTransactionsCommand, ResetDeleteTransactionsCommand, TransactionsCompute,
};
use cardledger_states::{State as StateTrait, state_assign_impl};
use egui::{Align, Button, Color32, Response, Ui};
use egui_extras::Column;

use crate::state::State;
use crate::widgets::{ColumnDef, DataTable, RowSelection};

/// UI state owned by the transactions page: which rows are ticked.
///
/// Keys are transaction ids rendered as strings (the table's row ids);
/// entries with value `true` are exactly the selected rows.
#[derive(Debug, Clone, Default)]
pub struct TransactionsPageState {
    pub selected: HashMap<String, bool>,
}

impl TransactionsPageState {
    /// Selected transaction ids, ascending.
    pub fn selected_ids(&self) -> Vec<i64> {
        #[expect(clippy::iter_over_hash_type, reason = "sorted before use")]
        let mut ids: Vec<i64> = self
            .selected
            .iter()
            .filter(|(_, selected)| **selected)
            .filter_map(|(id, _)| id.parse().ok())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

impl StateTrait for TransactionsPageState {
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

fn transaction_columns<'a>() -> Vec<ColumnDef<'a, Transaction>> {
    vec![
        ColumnDef::select(),
        ColumnDef::new("date", "Date", |ui, tx: &Transaction, _| {
            ui.monospace(tx.occurred_at.format("%Y-%m-%d").to_string());
        })
        .width(Column::exact(90.0))
        .sortable(),
        ColumnDef::new("kind", "Kind", |ui, tx: &Transaction, _| {
            ui.label(tx.kind.label());
        })
        .width(Column::exact(72.0)),
        ColumnDef::new("platform", "Platform", |ui, tx: &Transaction, _| {
            ui.label(&tx.platform);
        })
        .width(Column::remainder().at_least(100.0)),
        ColumnDef::new("items", "Items", |ui, tx: &Transaction, _| {
            ui.monospace(tx.line_items.len().to_string());
        })
        .width(Column::exact(48.0))
        .align(Align::Max),
        ColumnDef::new("fees", "Fees", |ui, tx: &Transaction, _| {
            ui.monospace(format_cents(tx.fee_cents));
        })
        .width(Column::exact(80.0))
        .align(Align::Max),
        ColumnDef::new("total", "Total", |ui, tx: &Transaction, _| {
            ui.monospace(format_cents(tx.total_cents));
        })
        .width(Column::exact(90.0))
        .align(Align::Max)
        .sortable(),
    ]
}

pub fn transactions_page(state: &mut State, ui: &mut Ui) -> Response {
    let ctx = &mut state.ctx;

    // Bulk delete finished: clear the selection and reset the cache so the
    // toolbar stops reporting progress.
    if let Some(count) = ctx
        .cached::<DeleteTransactionsCompute>()
        .and_then(DeleteTransactionsCompute::deleted)
    {
        log::info!("bulk delete removed {count} transactions");
        ctx.state_mut::<TransactionsPageState>().clear();
        ctx.dispatch::<ResetDeleteTransactionsCommand>();
    }

    let (loading, error) = {
        let compute = ctx.cached::<TransactionsCompute>();
        (
            compute.is_none_or(|c| c.is_idle() || c.is_loading()),
            compute
                .and_then(TransactionsCompute::error_message)
                .map(str::to_owned),
        )
    };
    let (deleting, delete_error) = {
        let compute = ctx.cached::<DeleteTransactionsCompute>();
        (
            compute.is_some_and(DeleteTransactionsCompute::is_deleting),
            compute
                .and_then(DeleteTransactionsCompute::error_message)
                .map(str::to_owned),
        )
    };
    let selected_ids = ctx.state::<TransactionsPageState>().selected_ids();

    let mut refresh = false;
    let mut open_new = false;
    let mut delete_selected = false;
    let mut clicked_id: Option<i64> = None;
    let mut selection_change: Option<HashMap<String, bool>> = None;

    let response = ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.heading("Transactions");
            refresh = ui.button("🔄 Refresh").clicked();
            open_new = ui.button("➕ New transaction").clicked();

            let delete_enabled = !selected_ids.is_empty() && !deleting;
            delete_selected = ui
                .add_enabled(
                    delete_enabled,
                    Button::new(format!("🗑 Delete selected ({})", selected_ids.len())),
                )
                .clicked();

            if loading || deleting {
                ui.spinner();
            }
        });

        if let Some(message) = &error {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::RED, format!("Error: {message}"));
                refresh |= ui.button("Retry").clicked();
            });
        }
        if let Some(message) = &delete_error {
            ui.colored_label(Color32::RED, format!("Delete failed: {message}"));
        }

        ui.add_space(4.0);

        let selected_map = ctx.state::<TransactionsPageState>().selected.clone();
        let transactions = ctx
            .cached::<TransactionsCompute>()
            .and_then(TransactionsCompute::transactions)
            .unwrap_or(&[]);
        let row_id = |tx: &Transaction| tx.id.to_string();
        let mut on_change = |new_map: HashMap<String, bool>| selection_change = Some(new_map);
        DataTable::new("transactions_table", transaction_columns())
            .data(transactions)
            .loading(loading && error.is_none())
            .row_id(&row_id)
            .on_row_click(|tx, _| clicked_id = Some(tx.id))
            .selection(RowSelection {
                enabled: true,
                selected: &selected_map,
                on_change: &mut on_change,
            })
            .show(ui);
    });

    if let Some(new_map) = selection_change {
        ctx.state_mut::<TransactionsPageState>().selected = new_map;
    }

    if refresh {
        ctx.dispatch::<RefreshTransactionsCommand>();
    }

    if open_new {
        ctx.update::<Route>(|route| *route = Route::NewTransaction);
    }

    if delete_selected && !selected_ids.is_empty() {
        ctx.update::<DeleteTransactionsInput>(|input| input.ids = selected_ids.clone());
        ctx.dispatch::<DeleteTransactionsCommand>();
    }

    if let Some(id) = clicked_id {
        ctx.update::<Route>(|route| *route = Route::TransactionDetail { id });
    }

    response.response
}
