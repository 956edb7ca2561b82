//! Data shapes shared with the cardledger REST service.
//!
//! JSON field names are the Rust field names (snake_case); instants are
//! RFC 3339 strings, dates are `YYYY-MM-DD`, money is integer cents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Physical condition grades used across the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    NearMint,
    LightlyPlayed,
    ModeratelyPlayed,
    HeavilyPlayed,
    Damaged,
}

impl Condition {
    /// Short grade code shown in table cells.
    pub fn code(self) -> &'static str {
        match self {
            Self::NearMint => "NM",
            Self::LightlyPlayed => "LP",
            Self::ModeratelyPlayed => "MP",
            Self::HeavilyPlayed => "HP",
            Self::Damaged => "DMG",
        }
    }

    /// Full grade name for detail views.
    pub fn label(self) -> &'static str {
        match self {
            Self::NearMint => "Near Mint",
            Self::LightlyPlayed => "Lightly Played",
            Self::ModeratelyPlayed => "Moderately Played",
            Self::HeavilyPlayed => "Heavily Played",
            Self::Damaged => "Damaged",
        }
    }
}

/// One stocked printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Stock keeping unit, unique per printing and condition.
    pub sku: String,

    /// Card name.
    pub name: String,

    /// Set / expansion the printing belongs to.
    pub set_name: String,

    pub condition: Condition,

    /// Copies currently held.
    pub quantity: u32,

    /// Average acquisition cost per copy, in cents.
    pub avg_cost_cents: i64,

    /// Latest known market price per copy, in cents. Absent when the SKU
    /// has no market data yet.
    pub market_price_cents: Option<i64>,

    /// Last time quantity or pricing changed.
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Unrealized margin of market price over average cost, in percent.
    ///
    /// `None` without market data or with a non-positive cost basis.
    pub fn margin_percent(&self) -> Option<f64> {
        let market = self.market_price_cents? as f64;
        if self.avg_cost_cents <= 0 {
            return None;
        }
        let cost = self.avg_cost_cents as f64;
        Some((market - cost) / cost * 100.0)
    }
}

/// Direction of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Sale,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Sale => "Sale",
        }
    }
}

/// One SKU's share of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,

    /// Card name at the time of the transaction.
    pub name: String,

    pub quantity: u32,

    /// Allocated share of the transaction total, in cents. Authoritative;
    /// the unit price is derived for display.
    pub line_total_cents: i64,
}

impl LineItem {
    /// Per-copy price derived from the allocated total (floor division;
    /// zero quantity yields zero).
    pub fn unit_price_cents(&self) -> i64 {
        if self.quantity == 0 {
            0
        } else {
            self.line_total_cents / i64::from(self.quantity)
        }
    }
}

/// A recorded purchase or sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,

    pub kind: TransactionKind,

    /// Marketplace or venue, e.g. "TCGplayer", "eBay", "LGS".
    pub platform: String,

    pub occurred_at: DateTime<Utc>,

    /// Gross amount, in cents.
    pub total_cents: i64,

    /// Marketplace and payment fees, in cents.
    pub fee_cents: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// One day of market pricing for a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,

    /// Market price per copy on that day, in cents.
    pub market_price_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInventoryResponse {
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryResponse {
    pub sku: String,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Line submitted with a new transaction; totals are pre-allocated by the
/// client (see [`crate::allocation`]) and re-validated server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub kind: TransactionKind,
    pub platform: String,
    pub occurred_at: DateTime<Utc>,
    pub total_cents: i64,
    pub fee_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub line_items: Vec<NewLineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTransactionsRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTransactionsResponse {
    /// Number of transactions actually removed.
    pub deleted: u32,
}
