//! Generic tabular data renderer.
//!
//! Every table in the app goes through [`DataTable`]: pages supply ordered
//! [`ColumnDef`]s and a record slice, and the renderer handles the three
//! presentation states (loading skeleton, "No results.", populated rows)
//! plus optional row clicks and externally controlled row selection.
//!
//! The renderer owns no state of its own. Records, selection flags and
//! navigation all live with the calling page; the widget only reads them
//! and reports interactions back through callbacks.

use std::collections::HashMap;

use egui::{Align, Checkbox, Layout, Sense, Ui, WidgetInfo, WidgetType, vec2};
use egui_extras::{Column, TableBuilder};

/// Placeholder rows rendered while a fetch is in flight.
pub const LOADING_ROW_COUNT: usize = 5;

pub const ROW_HEIGHT: f32 = 28.0;
pub const HEADER_HEIGHT: f32 = 24.0;

const SELECT_COLUMN_WIDTH: f32 = 28.0;

/// Per-row context handed to cell renderers and callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCtx {
    /// Position in the `data` slice.
    pub index: usize,

    /// Selection key: the caller's `row_id` result, or the index as a
    /// string when no identity function was supplied.
    pub row_id: String,

    pub selected: bool,
}

enum HeaderDef<'a> {
    Label(String),
    Custom(Box<dyn Fn(&mut Ui) + 'a>),
}

/// Declarative description of one column: how its header and cells are
/// produced from records.
///
/// `sortable`/`hideable` are capability flags for toolbars built on top of
/// the table; the renderer itself never reorders or hides anything.
pub struct ColumnDef<'a, T> {
    id: String,
    header: HeaderDef<'a>,
    cell: Box<dyn Fn(&mut Ui, &T, &RowCtx) + 'a>,
    loading: Option<Box<dyn Fn(&mut Ui) + 'a>>,
    width: Column,
    align: Align,
    sortable: bool,
    hideable: bool,
    select: bool,
}

impl<'a, T> ColumnDef<'a, T> {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        cell: impl Fn(&mut Ui, &T, &RowCtx) + 'a,
    ) -> Self {
        Self {
            id: id.into(),
            header: HeaderDef::Label(label.into()),
            cell: Box::new(cell),
            loading: None,
            width: Column::remainder().at_least(40.0),
            align: Align::Min,
            sortable: false,
            hideable: false,
            select: false,
        }
    }

    /// The checkbox column. Renders nothing unless the table is shown with
    /// an enabled [`RowSelection`].
    pub fn select() -> Self {
        Self {
            id: "select".to_owned(),
            header: HeaderDef::Label(String::new()),
            cell: Box::new(|_, _, _| {}),
            loading: Some(Box::new(|_| {})),
            width: Column::exact(SELECT_COLUMN_WIDTH),
            align: Align::Center,
            sortable: false,
            hideable: false,
            select: true,
        }
    }

    /// Replace the static header label with a render closure.
    pub fn header_with(mut self, header: impl Fn(&mut Ui) + 'a) -> Self {
        self.header = HeaderDef::Custom(Box::new(header));
        self
    }

    /// Per-column loading placeholder; without one the generic shimmer bar
    /// is used.
    pub fn loading_with(mut self, loading: impl Fn(&mut Ui) + 'a) -> Self {
        self.loading = Some(Box::new(loading));
        self
    }

    pub fn width(mut self, width: Column) -> Self {
        self.width = width;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn hideable(mut self) -> Self {
        self.hideable = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }
}

/// Controlled selection wiring: the map is owned by the caller and the
/// renderer only reports full updated maps through `on_change`.
pub struct RowSelection<'a> {
    pub enabled: bool,
    pub selected: &'a HashMap<String, bool>,
    pub on_change: &'a mut dyn FnMut(HashMap<String, bool>),
}

/// The table widget. Build with [`DataTable::new`], chain the optional
/// inputs, then [`DataTable::show`] once per frame.
pub struct DataTable<'a, T> {
    id_salt: egui::Id,
    columns: Vec<ColumnDef<'a, T>>,
    data: &'a [T],
    loading: bool,
    on_row_click: Option<Box<dyn FnMut(&T, &RowCtx) + 'a>>,
    selection: Option<RowSelection<'a>>,
    row_id: Option<&'a dyn Fn(&T) -> String>,
}

impl<'a, T> DataTable<'a, T> {
    pub fn new(id_salt: impl std::hash::Hash, columns: Vec<ColumnDef<'a, T>>) -> Self {
        Self {
            id_salt: egui::Id::new(id_salt),
            columns,
            data: &[],
            loading: false,
            on_row_click: None,
            selection: None,
            row_id: None,
        }
    }

    pub fn data(mut self, data: &'a [T]) -> Self {
        self.data = data;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Make rows click-sensitive. Clicks consumed by interactive cell
    /// widgets (selection checkboxes) never reach this callback.
    pub fn on_row_click(mut self, on_row_click: impl FnMut(&T, &RowCtx) + 'a) -> Self {
        self.on_row_click = Some(Box::new(on_row_click));
        self
    }

    pub fn selection(mut self, selection: RowSelection<'a>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Stable row identity used for selection keys; defaults to the
    /// positional index.
    pub fn row_id(mut self, row_id: &'a dyn Fn(&T) -> String) -> Self {
        self.row_id = Some(row_id);
        self
    }

    pub fn show(self, ui: &mut Ui) {
        let Self {
            id_salt,
            columns,
            data,
            loading,
            mut on_row_click,
            selection,
            row_id,
        } = self;

        let mut selection = selection.filter(|s| s.enabled);
        let clickable = on_row_click.is_some();

        let resolve_id = |index: usize, record: &T| -> String {
            match row_id {
                Some(f) => f(record),
                None => index.to_string(),
            }
        };

        // Row ids of the visible rows, for the select-all header checkbox.
        let visible_ids: Vec<String> = if loading || selection.is_none() {
            Vec::new()
        } else {
            data.iter()
                .enumerate()
                .map(|(index, record)| resolve_id(index, record))
                .collect()
        };

        // Interactions are collected here and reported after the table
        // borrow ends.
        let mut selection_change: Option<HashMap<String, bool>> = None;

        let mut builder = TableBuilder::new(ui)
            .id_salt(id_salt)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center));
        if clickable {
            builder = builder.sense(Sense::click());
        }
        for column in &columns {
            builder = builder.column(column.width);
        }

        let table = builder.header(HEADER_HEIGHT, |mut header_row| {
            for column in &columns {
                header_row.col(|ui| {
                    if column.select {
                        if let Some(sel) = selection.as_ref() {
                            select_all_checkbox(
                                ui,
                                &visible_ids,
                                sel.selected,
                                &mut selection_change,
                            );
                        }
                        return;
                    }
                    match &column.header {
                        HeaderDef::Label(text) => {
                            if !text.is_empty() {
                                ui.centered_and_justified(|ui| {
                                    ui.strong(text);
                                });
                            }
                        }
                        HeaderDef::Custom(render) => render(ui),
                    }
                });
            }
        });

        table.body(|body| {
            if loading {
                // `data` is deliberately not read in this branch.
                body.rows(ROW_HEIGHT, LOADING_ROW_COUNT, |mut row| {
                    for column in &columns {
                        row.col(|ui| match &column.loading {
                            Some(placeholder) => placeholder(ui),
                            None => shimmer_placeholder(ui),
                        });
                    }
                });
            } else if !data.is_empty() {
                body.rows(ROW_HEIGHT, data.len(), |mut row| {
                    let index = row.index();
                    let record = &data[index];
                    let row_id = resolve_id(index, record);
                    let selected = selection
                        .as_ref()
                        .is_some_and(|sel| sel.selected.get(&row_id).copied().unwrap_or(false));
                    let row_ctx = RowCtx {
                        index,
                        row_id,
                        selected,
                    };

                    if selection.is_some() {
                        row.set_selected(selected);
                    }

                    for column in &columns {
                        row.col(|ui| {
                            if column.select {
                                if let Some(sel) = selection.as_ref() {
                                    row_checkbox(ui, &row_ctx, sel.selected, &mut selection_change);
                                }
                                return;
                            }
                            aligned(ui, column.align, |ui| (column.cell)(ui, record, &row_ctx));
                        });
                    }

                    if let Some(on_click) = on_row_click.as_mut()
                        && row.response().clicked()
                    {
                        on_click(record, &row_ctx);
                    }
                });
            }
        });

        if !loading && data.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.weak("No results.");
                ui.add_space(8.0);
            });
        }

        if let Some(sel) = selection.as_mut()
            && let Some(new_map) = selection_change
        {
            (sel.on_change)(new_map);
        }
    }
}

fn aligned(ui: &mut Ui, align: Align, add_contents: impl FnOnce(&mut Ui)) {
    match align {
        Align::Min => {
            add_contents(ui);
        }
        Align::Center => {
            ui.centered_and_justified(add_contents);
        }
        Align::Max => {
            ui.with_layout(Layout::right_to_left(Align::Center), add_contents);
        }
    }
}

/// Generic loading placeholder: a pulsing bar roughly the width of the
/// cell.
fn shimmer_placeholder(ui: &mut Ui) {
    let desired = vec2((ui.available_width() - 8.0).max(24.0), 10.0);
    let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
    if ui.is_rect_visible(rect) {
        let time = ui.input(|i| i.time);
        let pulse = 0.5 + 0.5 * (time * 3.0).sin() as f32;
        let color = ui
            .visuals()
            .weak_text_color()
            .gamma_multiply(0.25 + 0.3 * pulse);
        ui.painter().rect_filled(rect, 3.0, color);
    }
    ui.ctx().request_repaint();
}

fn row_checkbox(
    ui: &mut Ui,
    row_ctx: &RowCtx,
    selected: &HashMap<String, bool>,
    selection_change: &mut Option<HashMap<String, bool>>,
) {
    let mut checked = row_ctx.selected;
    let response = ui.add(Checkbox::without_text(&mut checked));
    response.widget_info(|| {
        WidgetInfo::selected(
            WidgetType::Checkbox,
            true,
            checked,
            format!("Select row {}", row_ctx.row_id),
        )
    });
    if response.changed() {
        *selection_change = Some(toggled_selection(selected, &row_ctx.row_id, checked));
    }
}

/// Next selection map after one row's checkbox flips to `checked`.
fn toggled_selection(
    selected: &HashMap<String, bool>,
    row_id: &str,
    checked: bool,
) -> HashMap<String, bool> {
    let mut new_map = selected.clone();
    new_map.insert(row_id.to_owned(), checked);
    new_map
}

/// `(all, some)` selection summary over the visible rows.
fn selection_summary(visible_ids: &[String], selected: &HashMap<String, bool>) -> (bool, bool) {
    let selected_count = visible_ids
        .iter()
        .filter(|id| selected.get(id.as_str()).copied().unwrap_or(false))
        .count();
    let all_selected = !visible_ids.is_empty() && selected_count == visible_ids.len();
    let some_selected = selected_count > 0 && !all_selected;
    (all_selected, some_selected)
}

/// Next selection map after a select-all click: clear when everything was
/// already selected, otherwise select every visible row.
fn select_all_selection(all_selected: bool, visible_ids: &[String]) -> HashMap<String, bool> {
    if all_selected {
        HashMap::new()
    } else {
        visible_ids.iter().map(|id| (id.clone(), true)).collect()
    }
}

fn select_all_checkbox(
    ui: &mut Ui,
    visible_ids: &[String],
    selected: &HashMap<String, bool>,
    selection_change: &mut Option<HashMap<String, bool>>,
) {
    let (all_selected, some_selected) = selection_summary(visible_ids, selected);

    let mut checked = all_selected;
    let response = ui.add(Checkbox::without_text(&mut checked).indeterminate(some_selected));
    response.widget_info(|| {
        WidgetInfo::selected(WidgetType::Checkbox, true, checked, "Select all rows")
    });
    if response.clicked() {
        *selection_change = Some(select_all_selection(all_selected, visible_ids));
    }
}
