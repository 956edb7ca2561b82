//! One transaction with its line items.

use cardledger_business::Route;
use cardledger_business::model::LineItem;
use cardledger_business::money::format_cents;
use cardledger_business::transactions::TransactionsCompute;
use egui::{Align, Response, Ui};
use egui_extras::Column;

use crate::state::State;
use crate::widgets::{ColumnDef, DataTable};

fn line_item_columns<'a>() -> Vec<ColumnDef<'a, LineItem>> {
    vec![
        ColumnDef::new("sku", "SKU", |ui, line: &LineItem, _| {
            ui.monospace(&line.sku);
        })
        .width(Column::exact(110.0)),
        ColumnDef::new("name", "Name", |ui, line: &LineItem, _| {
            ui.label(&line.name);
        })
        .width(Column::remainder().at_least(140.0)),
        ColumnDef::new("quantity", "Qty", |ui, line: &LineItem, _| {
            ui.monospace(line.quantity.to_string());
        })
        .width(Column::exact(40.0))
        .align(Align::Max),
        ColumnDef::new("unit", "Unit", |ui, line: &LineItem, _| {
            ui.monospace(format_cents(line.unit_price_cents()));
        })
        .width(Column::exact(80.0))
        .align(Align::Max),
        ColumnDef::new("line_total", "Line total", |ui, line: &LineItem, _| {
            ui.monospace(format_cents(line.line_total_cents));
        })
        .width(Column::exact(90.0))
        .align(Align::Max),
    ]
}

pub fn transaction_detail_page(state: &mut State, id: i64, ui: &mut Ui) -> Response {
    let ctx = &mut state.ctx;

    let mut go_back = false;

    let response = ui.vertical(|ui| {
        ui.horizontal(|ui| {
            go_back = ui.button("← Transactions").clicked();
            ui.heading(format!("Transaction #{id}"));
        });
        ui.add_space(4.0);

        let transaction = ctx
            .cached::<TransactionsCompute>()
            .and_then(|compute| compute.find(id))
            .cloned();
        let Some(tx) = transaction else {
            ui.weak("Not in the loaded ledger.");
            return;
        };

        egui::Grid::new("transaction_facts")
            .num_columns(2)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                ui.weak("Kind");
                ui.label(tx.kind.label());
                ui.end_row();
                ui.weak("Platform");
                ui.label(&tx.platform);
                ui.end_row();
                ui.weak("Date");
                ui.label(tx.occurred_at.format("%Y-%m-%d %H:%M UTC").to_string());
                ui.end_row();
                ui.weak("Total");
                ui.monospace(format_cents(tx.total_cents));
                ui.end_row();
                ui.weak("Fees");
                ui.monospace(format_cents(tx.fee_cents));
                ui.end_row();
                if let Some(notes) = &tx.notes {
                    ui.weak("Notes");
                    ui.label(notes);
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        ui.strong("Line items");
        ui.add_space(4.0);

        DataTable::new(("line_items_table", id), line_item_columns())
            .data(&tx.line_items)
            .show(ui);
    });

    if go_back {
        ctx.update::<Route>(|route| *route = Route::Transactions);
    }

    response.response
}
