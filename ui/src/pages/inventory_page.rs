//! Inventory table, the landing page.

use cardledger_business::Route;
use cardledger_business::inventory::{
    FetchPriceHistoryCommand, InventoryCompute, PriceHistoryInput, RefreshInventoryCommand,
};
use cardledger_business::model::InventoryItem;
use cardledger_business::money::format_cents;
use egui::{Align, Color32, Response, Ui};
use egui_extras::Column;
use ustr::Ustr;

use crate::state::State;
use crate::widgets::{ColumnDef, DataTable};

fn margin_cell(ui: &mut Ui, item: &InventoryItem) {
    match item.margin_percent() {
        Some(margin) => {
            let color = if margin >= 0.0 {
                Color32::from_rgb(34, 139, 34)
            } else {
                Color32::from_rgb(205, 50, 50)
            };
            ui.colored_label(color, format!("{margin:+.1}%"));
        }
        None => {
            ui.weak("—");
        }
    }
}

fn inventory_columns<'a>() -> Vec<ColumnDef<'a, InventoryItem>> {
    vec![
        ColumnDef::new("sku", "SKU", |ui, item: &InventoryItem, _| {
            ui.monospace(&item.sku);
        })
        .width(Column::exact(110.0))
        .sortable(),
        ColumnDef::new("name", "Name", |ui, item: &InventoryItem, _| {
            ui.label(&item.name);
        })
        .width(Column::remainder().at_least(140.0))
        .sortable(),
        ColumnDef::new("set", "Set", |ui, item: &InventoryItem, _| {
            ui.label(&item.set_name);
        })
        .width(Column::remainder().at_least(100.0))
        .hideable(),
        ColumnDef::new("condition", "Cond", |ui, item: &InventoryItem, _| {
            ui.label(item.condition.code());
        })
        .width(Column::exact(44.0))
        .align(Align::Center),
        ColumnDef::new("quantity", "Qty", |ui, item: &InventoryItem, _| {
            ui.monospace(item.quantity.to_string());
        })
        .width(Column::exact(40.0))
        .align(Align::Max),
        ColumnDef::new("avg_cost", "Avg cost", |ui, item: &InventoryItem, _| {
            ui.monospace(format_cents(item.avg_cost_cents));
        })
        .width(Column::exact(80.0))
        .align(Align::Max),
        ColumnDef::new("market", "Market", |ui, item: &InventoryItem, _| {
            match item.market_price_cents {
                Some(cents) => {
                    ui.monospace(format_cents(cents));
                }
                None => {
                    ui.weak("—");
                }
            }
        })
        .width(Column::exact(80.0))
        .align(Align::Max),
        ColumnDef::new("margin", "Margin", |ui, item: &InventoryItem, _| {
            margin_cell(ui, item);
        })
        .width(Column::exact(70.0))
        .align(Align::Max),
    ]
}

pub fn inventory_page(state: &mut State, ui: &mut Ui) -> Response {
    let ctx = &mut state.ctx;

    let (loading, item_count, error) = {
        let compute = ctx.cached::<InventoryCompute>();
        (
            compute.is_none_or(|c| c.is_idle() || c.is_loading()),
            compute.and_then(InventoryCompute::items).map(<[_]>::len),
            compute
                .and_then(InventoryCompute::error_message)
                .map(str::to_owned),
        )
    };

    let mut refresh = false;
    let mut clicked_sku: Option<Ustr> = None;

    let response = ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.heading("Inventory");
            refresh = ui.button("🔄 Refresh").clicked();
            if loading {
                ui.spinner();
            }
            if let Some(count) = item_count {
                ui.weak(format!("{count} items"));
            }
        });

        if let Some(message) = &error {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::RED, format!("Error: {message}"));
                refresh |= ui.button("Retry").clicked();
            });
        }

        ui.add_space(4.0);

        let items = ctx
            .cached::<InventoryCompute>()
            .and_then(InventoryCompute::items)
            .unwrap_or(&[]);
        let row_id = |item: &InventoryItem| item.sku.clone();
        DataTable::new("inventory_table", inventory_columns())
            .data(items)
            .loading(loading && error.is_none())
            .row_id(&row_id)
            .on_row_click(|item, _| clicked_sku = Some(Ustr::from(&item.sku)))
            .show(ui);
    });

    if refresh {
        ctx.dispatch::<RefreshInventoryCommand>();
    }

    if let Some(sku) = clicked_sku {
        ctx.update::<PriceHistoryInput>(|input| input.sku = Some(sku));
        ctx.dispatch::<FetchPriceHistoryCommand>();
        ctx.update::<Route>(|route| *route = Route::ItemDetail { sku });
    }

    response.response
}
