//! Route state for page navigation.

use std::any::Any;

use cardledger_states::{State, state_assign_impl};
use ustr::Ustr;

/// The page currently shown in the central panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// Inventory table, the landing page.
    #[default]
    Inventory,
    /// Per-SKU analytics for one inventory item.
    ItemDetail { sku: Ustr },
    /// Transaction ledger table.
    Transactions,
    /// One transaction with its line items.
    TransactionDetail { id: i64 },
    /// Form for recording a new transaction.
    NewTransaction,
}

impl Route {
    /// Which top-bar tab the route belongs to.
    pub fn is_inventory_tab(self) -> bool {
        matches!(self, Self::Inventory | Self::ItemDetail { .. })
    }

    pub fn is_transactions_tab(self) -> bool {
        matches!(
            self,
            Self::Transactions | Self::TransactionDetail { .. } | Self::NewTransaction
        )
    }
}

impl State for Route {
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
