//! Pages module for the application.
//!
//! One function per route:
//! - `inventory_page`: the card inventory table
//! - `item_detail_page`: facts and price history for one SKU
//! - `transactions_page`: the transaction ledger with bulk delete
//! - `transaction_detail_page`: one transaction and its line items
//! - `new_transaction_page`: form for recording a purchase or sale

mod inventory_page;
mod item_detail_page;
mod new_transaction_page;
mod transaction_detail_page;
mod transactions_page;

pub use inventory_page::inventory_page;
pub use item_detail_page::item_detail_page;
pub use new_transaction_page::{LineDraft, NewTransactionForm, new_transaction_page};
pub use transaction_detail_page::transaction_detail_page;
pub use transactions_page::{TransactionsPageState, transactions_page};
