//! # Mock Framework
//!
//! Utilities for testing the cart controller against a scripted inventory.
//!
//! Use [`create_mock_inventory`] to get an inventory and a receiver.
//! Then use helpers like [`expect_stock`] or [`expect_product`] to answer
//! each query the controller makes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{CatalogItem, ProductId, StockRecord};
use crate::services::{InventoryError, InventoryService, Notice, NotificationSink};

pub type Responder<T> = oneshot::Sender<Result<T, InventoryError>>;

/// A query the controller sent to the inventory, waiting for the test to answer.
#[derive(Debug)]
pub enum InventoryQuery {
    Stock {
        id: ProductId,
        respond_to: Responder<StockRecord>,
    },
    Product {
        id: ProductId,
        respond_to: Responder<CatalogItem>,
    },
}

/// Inventory whose answers come from the test through a channel.
///
/// The controller suspends on every query until the test responds, which lets
/// tests observe exactly when each query is issued.
#[derive(Clone)]
pub struct MockInventory {
    sender: mpsc::Sender<InventoryQuery>,
}

/// Creates a mock inventory and a receiver for asserting and answering queries.
pub fn create_mock_inventory(buffer_size: usize) -> (Arc<MockInventory>, mpsc::Receiver<InventoryQuery>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(MockInventory { sender }), receiver)
}

impl MockInventory {
    async fn ask<T>(&self, query: impl FnOnce(Responder<T>) -> InventoryQuery) -> Result<T, InventoryError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(query(respond_to))
            .await
            .map_err(|_| InventoryError::Transport("Mock closed".to_string()))?;
        response
            .await
            .map_err(|_| InventoryError::Transport("Mock dropped".to_string()))?
    }
}

#[async_trait]
impl InventoryService for MockInventory {
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, InventoryError> {
        self.ask(|respond_to| InventoryQuery::Stock { id, respond_to }).await
    }

    async fn get_product(&self, id: ProductId) -> Result<CatalogItem, InventoryError> {
        self.ask(|respond_to| InventoryQuery::Product { id, respond_to }).await
    }
}

/// Helper to verify that the next query is a stock lookup
pub async fn expect_stock(receiver: &mut mpsc::Receiver<InventoryQuery>) -> Option<(ProductId, Responder<StockRecord>)> {
    match receiver.recv().await {
        Some(InventoryQuery::Stock { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next query is a catalog lookup
pub async fn expect_product(receiver: &mut mpsc::Receiver<InventoryQuery>) -> Option<(ProductId, Responder<CatalogItem>)> {
    match receiver.recv().await {
        Some(InventoryQuery::Product { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Notification sink that keeps every notice for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_inventory() {
        let (inventory, mut receiver) = create_mock_inventory(4);

        let query = tokio::spawn(async move { inventory.get_stock(3).await });

        let (id, responder) = expect_stock(&mut receiver).await.expect("Expected stock query");
        assert_eq!(id, 3);
        responder.send(Ok(StockRecord::new(3, 7))).unwrap();

        assert_eq!(query.await.unwrap(), Ok(StockRecord::new(3, 7)));
    }
}
