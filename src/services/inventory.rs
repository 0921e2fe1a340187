use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::{CatalogItem, ProductId, StockRecord};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Product not found in inventory: {0}")]
    NotFound(ProductId),
    #[error("Inventory transport error: {0}")]
    Transport(String),
}

/// Read-only queries against the storefront inventory.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Available quantity of a product. Fails if the product is unknown or
    /// the service cannot be reached.
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, InventoryError>;

    /// Catalog details of a product.
    async fn get_product(&self, id: ProductId) -> Result<CatalogItem, InventoryError>;
}

/// Inventory backed by a JSON REST catalog exposing `stock/{id}` and
/// `products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpInventory {
    client: Client,
    base_url: Url,
}

impl HttpInventory {
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, InventoryError> {
        // Url::join drops the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InventoryError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    async fn fetch<T: DeserializeOwned>(&self, id: ProductId, resource: &str) -> Result<T, InventoryError> {
        let url = self
            .base_url
            .join(&format!("{}/{}", resource, id))
            .map_err(|e| InventoryError::Transport(e.to_string()))?;

        debug!(%url, "Querying inventory");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InventoryError::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(id));
        }

        response
            .error_for_status()
            .map_err(|e| InventoryError::Transport(e.to_string()))?
            .json::<T>()
            .await
            .map_err(|e| InventoryError::Transport(e.to_string()))
    }
}

#[async_trait]
impl InventoryService for HttpInventory {
    #[instrument(skip(self))]
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, InventoryError> {
        self.fetch(id, "stock").await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<CatalogItem, InventoryError> {
        self.fetch(id, "products").await
    }
}

/// Inventory held in memory, seeded up front.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    entries: RwLock<HashMap<ProductId, (CatalogItem, u32)>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, item: CatalogItem, stock: u32) -> Self {
        self.insert(item, stock);
        self
    }

    pub fn insert(&self, item: CatalogItem, stock: u32) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(item.id, (item, stock));
    }

    /// Changes the available quantity of a known product. Returns `false` if
    /// the product is unknown.
    pub fn set_stock(&self, id: ProductId, stock: u32) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(&id) {
            Some(entry) => {
                entry.1 = stock;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl InventoryService for InMemoryInventory {
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, InventoryError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&id)
            .map(|(_, stock)| StockRecord::new(id, *stock))
            .ok_or(InventoryError::NotFound(id))
    }

    async fn get_product(&self, id: ProductId) -> Result<CatalogItem, InventoryError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&id)
            .map(|(item, _)| item.clone())
            .ok_or(InventoryError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use tokio::net::TcpListener;

    async fn serve_catalog() -> Url {
        async fn stock(Path(id): Path<u64>) -> Result<Json<StockRecord>, AxumStatus> {
            match id {
                1 => Ok(Json(StockRecord::new(1, 3))),
                2 => Ok(Json(StockRecord::new(2, 0))),
                500 => Err(AxumStatus::INTERNAL_SERVER_ERROR),
                _ => Err(AxumStatus::NOT_FOUND),
            }
        }

        async fn product(Path(id): Path<u64>) -> Result<Json<CatalogItem>, AxumStatus> {
            match id {
                1 => Ok(Json(CatalogItem::new(1, "Running shoe", 179.9, "shoe.jpg"))),
                _ => Err(AxumStatus::NOT_FOUND),
            }
        }

        let app = Router::new()
            .route("/api/stock/:id", get(stock))
            .route("/api/products/:id", get(product));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}/api", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_http_inventory_queries() {
        let base = serve_catalog().await;
        let inventory = HttpInventory::new(base, Duration::from_secs(5)).unwrap();

        assert_eq!(inventory.get_stock(1).await, Ok(StockRecord::new(1, 3)));
        assert_eq!(inventory.get_stock(2).await, Ok(StockRecord::new(2, 0)));
        assert_eq!(inventory.get_stock(9).await, Err(InventoryError::NotFound(9)));
        assert!(matches!(inventory.get_stock(500).await, Err(InventoryError::Transport(_))));

        let item = inventory.get_product(1).await.unwrap();
        assert_eq!(item.title, "Running shoe");
    }

    #[tokio::test]
    async fn test_http_inventory_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{}/", addr)).unwrap();
        let inventory = HttpInventory::new(base, Duration::from_secs(1)).unwrap();
        assert!(matches!(inventory.get_stock(1).await, Err(InventoryError::Transport(_))));
    }

    #[tokio::test]
    async fn test_in_memory_inventory() {
        let inventory = InMemoryInventory::new().with_product(CatalogItem::new(4, "Boot", 250.0, "boot.jpg"), 2);

        assert_eq!(inventory.get_stock(4).await, Ok(StockRecord::new(4, 2)));
        assert!(inventory.set_stock(4, 0));
        assert_eq!(inventory.get_stock(4).await, Ok(StockRecord::new(4, 0)));
        assert!(!inventory.set_stock(5, 1));
        assert_eq!(inventory.get_product(5).await, Err(InventoryError::NotFound(5)));
    }
}
