use std::fmt;

use tokio::sync::mpsc;
use tracing::warn;

use crate::cart_controller::{CartError, Operation};

/// The fixed set of user-facing messages the cart emits on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AddFailed,
    RemoveFailed,
    UpdateFailed,
    OutOfStock,
    InvalidAmount,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AddFailed => "Error adding product",
            Notice::RemoveFailed => "Error removing product",
            Notice::UpdateFailed => "Error changing product amount",
            Notice::OutOfStock => "Requested amount is out of stock",
            Notice::InvalidAmount => "Product amount must be at least 1",
        }
    }

    /// Picks the notice shown for a failed operation.
    ///
    /// Stock and amount failures have dedicated messages; everything else is
    /// reported with the generic message of the operation that failed.
    pub fn for_failure(operation: Operation, error: &CartError) -> Self {
        match error {
            CartError::OutOfStock { .. } => Notice::OutOfStock,
            CartError::InvalidAmount(_) => Notice::InvalidAmount,
            _ => match operation {
                Operation::Add => Notice::AddFailed,
                Operation::Remove => Notice::RemoveFailed,
                Operation::Update => Notice::UpdateFailed,
            },
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Fire-and-forget sink for user-facing notices.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes every notice to the log.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notice: Notice) {
        warn!(notice = ?notice, "{}", notice);
    }
}

/// Forwards notices to whoever displays them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // Nobody listening is not an error for a fire-and-forget sink.
        let _ = self.sender.send(notice);
    }
}
