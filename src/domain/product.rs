use serde::{Deserialize, Serialize};

/// Catalog identifier of a product.
pub type ProductId = u64;

/// Catalog details of a product, as returned by the inventory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
}

impl CatalogItem {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}

/// A catalog item held in the cart together with its in-cart quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub amount: u32,
}

impl Product {
    /// Creates a cart entry from catalog details.
    ///
    /// # Arguments
    /// * `item` - Catalog details fetched from the inventory service
    /// * `amount` - Quantity placed in the cart
    pub fn from_catalog(item: CatalogItem, amount: u32) -> Self {
        Self {
            id: item.id,
            title: item.title,
            price: item.price,
            image: item.image,
            amount,
        }
    }

    /// Returns a copy of this entry carrying a different amount.
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Request to set the quantity of a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: u32,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }
}
