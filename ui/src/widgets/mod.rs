pub mod api_status;
pub mod data_table;
mod env_version;
mod price_chart;

pub use api_status::api_status;
pub use data_table::{ColumnDef, DataTable, LOADING_ROW_COUNT, RowCtx, RowSelection};
pub use env_version::env_version;
pub use price_chart::price_chart;
