use thiserror::Error;

use crate::services::InventoryError;

/// Errors raised while configuring, starting, or stopping the cart system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Inventory setup failed: {0}")]
    Inventory(#[from] InventoryError),
    #[error("Actor task failed: {0}")]
    ActorTaskFailed(String),
}
