use thiserror::Error;

use crate::domain::ProductId;
use crate::services::InventoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },
    #[error("Invalid amount: {0}")]
    InvalidAmount(u32),
    #[error("Inventory transport error: {0}")]
    Transport(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<InventoryError> for CartError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => CartError::NotFound(id),
            InventoryError::Transport(msg) => CartError::Transport(msg),
        }
    }
}

/// The mutating operations, used to pick the notice for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}
