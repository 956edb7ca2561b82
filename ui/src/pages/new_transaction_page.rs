//! Form for recording a new transaction.
//!
//! The form owns text drafts only; on submit it validates, allocates the
//! total across the lines pro rata by market value x quantity, and hands
//! the finished request to [`SubmitTransactionCommand`]. The same
//! allocation runs every frame for the live preview table.

use std::any::Any;

use cardledger_business::Route;
use cardledger_business::allocation::allocate_pro_rata;
use cardledger_business::model::{CreateTransactionRequest, NewLineItem, TransactionKind};
use cardledger_business::money::{format_cents, parse_money};
use cardledger_business::transactions::{
    CreateTransactionCompute, CreateTransactionInput, ResetCreateTransactionCommand,
    SubmitTransactionCommand,
};
use cardledger_states::{State as StateTrait, state_assign_impl};
use chrono::{NaiveDate, NaiveTime, Utc};
use egui::{Align, Color32, Response, TextEdit, Ui};
use egui_extras::{Column, DatePickerButton};

use crate::state::State;
use crate::widgets::{ColumnDef, DataTable};

/// Marketplace presets offered next to the free-form platform field.
pub const PLATFORM_PRESETS: [&str; 5] = ["TCGplayer", "eBay", "Cardmarket", "LGS", "Other"];

/// One editable line of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDraft {
    pub sku: String,
    pub name: String,
    pub quantity_text: String,
    /// Market price per copy, dollars; the allocation weight is this times
    /// the quantity.
    pub market_text: String,
}

/// Draft state of the new-transaction form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransactionForm {
    pub kind: TransactionKind,
    pub platform: String,
    pub occurred_on: NaiveDate,
    pub total_text: String,
    pub fees_text: String,
    pub notes: String,
    pub lines: Vec<LineDraft>,
    /// Messages from the last failed submit attempt.
    pub errors: Vec<String>,
}

impl Default for NewTransactionForm {
    fn default() -> Self {
        Self {
            kind: TransactionKind::Purchase,
            platform: PLATFORM_PRESETS[0].to_owned(),
            occurred_on: Utc::now().date_naive(),
            total_text: String::new(),
            fees_text: String::new(),
            notes: String::new(),
            lines: vec![LineDraft::default()],
            errors: Vec::new(),
        }
    }
}

/// One row of the live allocation preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub weight_cents: i64,
    pub allocated_cents: i64,
}

impl NewTransactionForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn parsed_lines(&self) -> Result<Vec<(String, String, u32, i64)>, Vec<String>> {
        let mut errors = Vec::new();
        let mut parsed = Vec::with_capacity(self.lines.len());
        for (index, line) in self.lines.iter().enumerate() {
            let n = index + 1;
            let sku = line.sku.trim();
            let name = line.name.trim();
            if sku.is_empty() {
                errors.push(format!("Line {n}: SKU is required"));
            }
            if name.is_empty() {
                errors.push(format!("Line {n}: name is required"));
            }
            let quantity = match line.quantity_text.trim().parse::<u32>() {
                Ok(quantity) if quantity > 0 => quantity,
                _ => {
                    errors.push(format!("Line {n}: quantity must be a positive number"));
                    0
                }
            };
            let market_text = line.market_text.trim();
            let market_cents = if market_text.is_empty() {
                0
            } else {
                match parse_money(market_text) {
                    Some(cents) if cents >= 0 => cents,
                    _ => {
                        errors.push(format!("Line {n}: market price must be a dollar amount"));
                        0
                    }
                }
            };
            parsed.push((sku.to_owned(), name.to_owned(), quantity, market_cents));
        }
        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(errors)
        }
    }

    /// Validate and build the request, allocating the total across lines.
    pub fn build_request(&self) -> Result<CreateTransactionRequest, Vec<String>> {
        let mut errors = Vec::new();

        let total_cents = match parse_money(self.total_text.trim()) {
            Some(cents) if cents > 0 => cents,
            Some(_) => {
                errors.push("Total must be positive".to_owned());
                0
            }
            None => {
                errors.push("Total must be a dollar amount".to_owned());
                0
            }
        };

        let fees_text = self.fees_text.trim();
        let fee_cents = if fees_text.is_empty() {
            0
        } else {
            match parse_money(fees_text) {
                Some(cents) if cents >= 0 => cents,
                _ => {
                    errors.push("Fees must be a non-negative dollar amount".to_owned());
                    0
                }
            }
        };

        if self.platform.trim().is_empty() {
            errors.push("Platform is required".to_owned());
        }
        if self.lines.is_empty() {
            errors.push("At least one line item is required".to_owned());
        }

        let parsed = match self.parsed_lines() {
            Ok(parsed) => parsed,
            Err(line_errors) => {
                errors.extend(line_errors);
                Vec::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let weights: Vec<i64> = parsed
            .iter()
            .map(|(_, _, quantity, market_cents)| market_cents * i64::from(*quantity))
            .collect();
        let allocated = allocate_pro_rata(total_cents, &weights);

        let line_items = parsed
            .into_iter()
            .zip(allocated)
            .map(|((sku, name, quantity, _), line_total_cents)| NewLineItem {
                sku,
                name,
                quantity,
                line_total_cents,
            })
            .collect();

        let notes = self.notes.trim();
        Ok(CreateTransactionRequest {
            kind: self.kind,
            platform: self.platform.trim().to_owned(),
            occurred_at: self.occurred_on.and_time(NaiveTime::MIN).and_utc(),
            total_cents,
            fee_cents,
            notes: (!notes.is_empty()).then(|| notes.to_owned()),
            line_items,
        })
    }

    /// Allocation preview for the current drafts, or `None` while the
    /// total or any line fails to parse.
    pub fn preview(&self) -> Option<Vec<PreviewLine>> {
        let total_cents = parse_money(self.total_text.trim()).filter(|cents| *cents > 0)?;
        let parsed = self.parsed_lines().ok()?;
        if parsed.is_empty() {
            return None;
        }
        let weights: Vec<i64> = parsed
            .iter()
            .map(|(_, _, quantity, market_cents)| market_cents * i64::from(*quantity))
            .collect();
        let allocated = allocate_pro_rata(total_cents, &weights);
        Some(
            parsed
                .into_iter()
                .zip(weights)
                .zip(allocated)
                .map(
                    |(((sku, name, quantity, _), weight_cents), allocated_cents)| PreviewLine {
                        sku,
                        name,
                        quantity,
                        weight_cents,
                        allocated_cents,
                    },
                )
                .collect(),
        )
    }
}

impl StateTrait for NewTransactionForm {
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

fn preview_columns<'a>() -> Vec<ColumnDef<'a, PreviewLine>> {
    vec![
        ColumnDef::new("sku", "SKU", |ui, line: &PreviewLine, _| {
            ui.monospace(&line.sku);
        })
        .width(Column::exact(110.0)),
        ColumnDef::new("name", "Name", |ui, line: &PreviewLine, _| {
            ui.label(&line.name);
        })
        .width(Column::remainder().at_least(120.0)),
        ColumnDef::new("quantity", "Qty", |ui, line: &PreviewLine, _| {
            ui.monospace(line.quantity.to_string());
        })
        .width(Column::exact(40.0))
        .align(Align::Max),
        ColumnDef::new("weight", "Weight", |ui, line: &PreviewLine, _| {
            ui.monospace(format_cents(line.weight_cents));
        })
        .width(Column::exact(90.0))
        .align(Align::Max),
        ColumnDef::new("allocated", "Allocated", |ui, line: &PreviewLine, _| {
            ui.monospace(format_cents(line.allocated_cents));
        })
        .width(Column::exact(90.0))
        .align(Align::Max),
    ]
}

pub fn new_transaction_page(state: &mut State, ui: &mut Ui) -> Response {
    let ctx = &mut state.ctx;

    // A successful save navigates back and leaves a clean form behind.
    if ctx
        .cached::<CreateTransactionCompute>()
        .and_then(CreateTransactionCompute::created)
        .is_some()
    {
        ctx.state_mut::<NewTransactionForm>().reset();
        ctx.dispatch::<ResetCreateTransactionCommand>();
        ctx.update::<Route>(|route| *route = Route::Transactions);
    }

    let (saving, save_error) = {
        let compute = ctx.cached::<CreateTransactionCompute>();
        (
            compute.is_some_and(CreateTransactionCompute::is_saving),
            compute
                .and_then(CreateTransactionCompute::error_message)
                .map(str::to_owned),
        )
    };

    let mut go_back = false;
    let mut submit = false;

    let response = ui.vertical(|ui| {
        ui.horizontal(|ui| {
            go_back = ui.button("← Transactions").clicked();
            ui.heading("New transaction");
            if saving {
                ui.spinner();
            }
        });
        ui.add_space(4.0);

        let form = ctx.state_mut::<NewTransactionForm>();

        ui.horizontal(|ui| {
            ui.label("Kind:");
            ui.selectable_value(&mut form.kind, TransactionKind::Purchase, "Purchase");
            ui.selectable_value(&mut form.kind, TransactionKind::Sale, "Sale");

            ui.separator();
            ui.label("Date:");
            ui.add(DatePickerButton::new(&mut form.occurred_on).id_salt("occurred_on"));
        });

        ui.horizontal(|ui| {
            ui.label("Platform:");
            egui::ComboBox::from_id_salt("platform_preset")
                .selected_text("presets")
                .show_ui(ui, |ui| {
                    for preset in PLATFORM_PRESETS {
                        if preset != "Other" && ui.selectable_label(false, preset).clicked() {
                            form.platform = preset.to_owned();
                        }
                    }
                });
            ui.add(
                TextEdit::singleline(&mut form.platform)
                    .hint_text("marketplace")
                    .desired_width(140.0),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Total:");
            ui.add(
                TextEdit::singleline(&mut form.total_text)
                    .hint_text("$0.00")
                    .desired_width(80.0),
            );
            ui.label("Fees:");
            ui.add(
                TextEdit::singleline(&mut form.fees_text)
                    .hint_text("$0.00")
                    .desired_width(80.0),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Notes:");
            ui.add(
                TextEdit::singleline(&mut form.notes)
                    .hint_text("optional")
                    .desired_width(320.0),
            );
        });

        ui.add_space(8.0);
        ui.strong("Line items");
        ui.add_space(4.0);

        let mut remove_line: Option<usize> = None;
        for (index, line) in form.lines.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.add(
                    TextEdit::singleline(&mut line.sku)
                        .hint_text("SKU")
                        .desired_width(110.0),
                );
                ui.add(
                    TextEdit::singleline(&mut line.name)
                        .hint_text("Name")
                        .desired_width(180.0),
                );
                ui.add(
                    TextEdit::singleline(&mut line.quantity_text)
                        .hint_text("Qty")
                        .desired_width(40.0),
                );
                ui.add(
                    TextEdit::singleline(&mut line.market_text)
                        .hint_text("Market $")
                        .desired_width(70.0),
                );
                if ui.button("✖").on_hover_text("Remove line").clicked() {
                    remove_line = Some(index);
                }
            });
        }
        if let Some(index) = remove_line {
            form.lines.remove(index);
        }
        if ui.button("➕ Add line").clicked() {
            form.lines.push(LineDraft::default());
        }

        ui.add_space(8.0);

        if let Some(preview) = form.preview() {
            ui.strong("Allocation preview");
            ui.add_space(4.0);
            DataTable::new("allocation_preview", preview_columns())
                .data(&preview)
                .show(ui);
            ui.add_space(8.0);
        }

        for message in &form.errors {
            ui.colored_label(Color32::RED, message);
        }
        if let Some(message) = &save_error {
            ui.colored_label(Color32::RED, format!("Save failed: {message}"));
        }

        ui.add_space(4.0);
        submit = ui
            .add_enabled(!saving, egui::Button::new("Save transaction"))
            .clicked();
    });

    if go_back {
        ctx.update::<Route>(|route| *route = Route::Transactions);
    }

    if submit {
        let built = ctx.state::<NewTransactionForm>().build_request();
        match built {
            Ok(request) => {
                ctx.state_mut::<NewTransactionForm>().errors.clear();
                ctx.update::<CreateTransactionInput>(|input| input.request = Some(request));
                ctx.dispatch::<SubmitTransactionCommand>();
            }
            Err(errors) => {
                ctx.state_mut::<NewTransactionForm>().errors = errors;
            }
        }
    }

    response.response
}

#[cfg(test)]
mod new_transaction_form_tests {
    use super::*;

    fn draft(sku: &str, name: &str, quantity: &str, market: &str) -> LineDraft {
        LineDraft {
            sku: sku.to_owned(),
            name: name.to_owned(),
            quantity_text: quantity.to_owned(),
            market_text: market.to_owned(),
        }
    }

    fn filled_form() -> NewTransactionForm {
        NewTransactionForm {
            total_text: "$100.00".to_owned(),
            fees_text: "$8.50".to_owned(),
            occurred_on: "2026-02-10".parse().unwrap(),
            lines: vec![
                draft("MH2-0123-NM", "Ragavan", "1", "60"),
                draft("NEO-0211-LP", "Emperor", "2", "20"),
            ],
            ..NewTransactionForm::default()
        }
    }

    #[test]
    fn build_request_allocates_the_total_exactly() {
        let request = filled_form().build_request().unwrap();
        assert_eq!(request.total_cents, 10_000);
        assert_eq!(request.fee_cents, 850);
        assert_eq!(request.line_items.len(), 2);
        let sum: i64 = request
            .line_items
            .iter()
            .map(|line| line.line_total_cents)
            .sum();
        assert_eq!(sum, 10_000, "allocated line totals must sum to the total");
        // Weights are 6000 and 4000 cents, so the split is 60/40.
        assert_eq!(request.line_items[0].line_total_cents, 6000);
        assert_eq!(request.line_items[1].line_total_cents, 4000);
    }

    #[test]
    fn build_request_rejects_a_missing_or_non_positive_total() {
        let mut form = filled_form();
        form.total_text = "abc".to_owned();
        let errors = form.build_request().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("dollar amount")));

        form.total_text = "0".to_owned();
        let errors = form.build_request().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("positive")));
    }

    #[test]
    fn build_request_requires_valid_lines() {
        let mut form = filled_form();
        form.lines = vec![draft("", "", "0", "nope")];
        let errors = form.build_request().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("SKU is required")));
        assert!(errors.iter().any(|e| e.contains("name is required")));
        assert!(errors.iter().any(|e| e.contains("quantity")));
        assert!(errors.iter().any(|e| e.contains("market price")));

        form.lines.clear();
        let errors = form.build_request().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("At least one line")));
    }

    #[test]
    fn empty_fees_default_to_zero() {
        let mut form = filled_form();
        form.fees_text = String::new();
        let request = form.build_request().unwrap();
        assert_eq!(request.fee_cents, 0);
    }

    #[test]
    fn notes_are_trimmed_and_optional() {
        let mut form = filled_form();
        form.notes = "  ".to_owned();
        assert_eq!(form.build_request().unwrap().notes, None);

        form.notes = " box split ".to_owned();
        assert_eq!(
            form.build_request().unwrap().notes,
            Some("box split".to_owned())
        );
    }

    #[test]
    fn preview_tracks_the_drafts_live() {
        let form = filled_form();
        let preview = form.preview().unwrap();
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0].weight_cents, 6000);
        assert_eq!(preview[1].weight_cents, 4000);
        assert_eq!(
            preview.iter().map(|line| line.allocated_cents).sum::<i64>(),
            10_000
        );

        let mut broken = form;
        broken.total_text = "n/a".to_owned();
        assert_eq!(broken.preview(), None);
    }

    #[test]
    fn missing_market_prices_fall_back_to_an_equal_split() {
        let mut form = filled_form();
        for line in &mut form.lines {
            line.market_text = String::new();
            line.quantity_text = "1".to_owned();
        }
        let request = form.build_request().unwrap();
        assert_eq!(request.line_items[0].line_total_cents, 5000);
        assert_eq!(request.line_items[1].line_total_cents, 5000);
    }

    #[test]
    fn occurred_at_is_midnight_utc_of_the_picked_date() {
        let request = filled_form().build_request().unwrap();
        assert_eq!(request.occurred_at.to_rfc3339(), "2026-02-10T00:00:00+00:00");
    }
}
