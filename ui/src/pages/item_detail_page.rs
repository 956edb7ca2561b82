//! Per-SKU analytics: summary facts plus the price history chart.

use cardledger_business::Route;
use cardledger_business::inventory::{
    FetchPriceHistoryCommand, InventoryCompute, PriceHistoryCompute, PriceHistoryInput,
};
use cardledger_business::money::format_cents;
use egui::{Color32, Response, Ui};
use ustr::Ustr;

use crate::state::State;
use crate::widgets::price_chart;

/// Ranges offered by the selector, in days.
const RANGE_OPTIONS: [u16; 3] = [7, 30, 90];

pub fn item_detail_page(state: &mut State, sku: Ustr, ui: &mut Ui) -> Response {
    let ctx = &mut state.ctx;

    let mut go_back = false;
    let mut new_days: Option<u16> = None;
    let mut retry = false;

    let response = ui.vertical(|ui| {
        ui.horizontal(|ui| {
            go_back = ui.button("← Inventory").clicked();
            ui.heading(sku.as_str());
        });
        ui.add_space(4.0);

        let item = ctx
            .cached::<InventoryCompute>()
            .and_then(|compute| compute.find(sku.as_str()))
            .cloned();
        match item {
            Some(item) => {
                egui::Grid::new("item_facts")
                    .num_columns(2)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        ui.weak("Name");
                        ui.label(&item.name);
                        ui.end_row();
                        ui.weak("Set");
                        ui.label(&item.set_name);
                        ui.end_row();
                        ui.weak("Condition");
                        ui.label(item.condition.label());
                        ui.end_row();
                        ui.weak("Quantity");
                        ui.monospace(item.quantity.to_string());
                        ui.end_row();
                        ui.weak("Avg cost");
                        ui.monospace(format_cents(item.avg_cost_cents));
                        ui.end_row();
                        ui.weak("Market");
                        match item.market_price_cents {
                            Some(cents) => {
                                ui.monospace(format_cents(cents));
                            }
                            None => {
                                ui.weak("no market data");
                            }
                        }
                        ui.end_row();
                        ui.weak("Updated");
                        ui.label(item.updated_at.format("%Y-%m-%d %H:%M UTC").to_string());
                        ui.end_row();
                    });
            }
            None => {
                ui.weak("Not in the loaded inventory.");
            }
        }

        ui.add_space(8.0);

        let days = ctx.state::<PriceHistoryInput>().days;
        ui.horizontal(|ui| {
            ui.label("Range:");
            for option in RANGE_OPTIONS {
                if ui
                    .selectable_label(days == option, format!("{option}d"))
                    .clicked()
                    && days != option
                {
                    new_days = Some(option);
                }
            }
        });
        ui.add_space(4.0);

        if let Some(history) = ctx.cached::<PriceHistoryCompute>() {
            if history.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading price history...");
                });
            } else if let Some(message) = history.error_message() {
                ui.colored_label(Color32::RED, format!("Error: {message}"));
                retry = ui.button("Retry").clicked();
            } else if let Some(points) = history.points_for(sku) {
                if points.is_empty() {
                    ui.weak("No price history for this range.");
                } else {
                    price_chart(ui, sku.as_str(), points);
                }
            } else {
                ui.weak("No price history loaded.");
            }
        }
    });

    if go_back {
        ctx.update::<Route>(|route| *route = Route::Inventory);
    }

    if let Some(days) = new_days {
        ctx.update::<PriceHistoryInput>(|input| {
            input.sku = Some(sku);
            input.days = days;
        });
        ctx.dispatch::<FetchPriceHistoryCommand>();
    }

    if retry {
        ctx.update::<PriceHistoryInput>(|input| input.sku = Some(sku));
        ctx.dispatch::<FetchPriceHistoryCommand>();
    }

    response.response
}
