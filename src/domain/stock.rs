use serde::{Deserialize, Serialize};

use super::ProductId;

/// Quantity of a product available in inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: u32,
}

impl StockRecord {
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Whether `requested` units can be taken from this record.
    pub fn covers(&self, requested: u32) -> bool {
        self.amount >= requested
    }
}
