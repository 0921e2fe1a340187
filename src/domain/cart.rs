use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Product, ProductId};

/// Reasons a persisted snapshot is rejected.
#[derive(Debug, Error)]
pub enum CartDecodeError {
    #[error("Malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Duplicate product in snapshot: {0}")]
    DuplicateProduct(ProductId),
    #[error("Invalid amount for product {0} in snapshot")]
    InvalidAmount(ProductId),
}

/// Immutable, ordered snapshot of the cart.
///
/// Cloning is cheap. Every mutation builds a new snapshot and leaves the
/// original untouched, so a snapshot handed out to a reader never changes
/// underneath it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Arc<Vec<Product>>,
}

impl From<Vec<Product>> for Cart {
    fn from(items: Vec<Product>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        Arc::unwrap_or_clone(cart.items)
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the amounts of all entries.
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|p| u64::from(p.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|p| p.price * f64::from(p.amount)).sum()
    }

    /// Returns a new cart with `product` appended, or `None` if an entry with
    /// the same id already exists.
    pub fn with_product(&self, product: Product) -> Option<Cart> {
        if self.contains(product.id) {
            return None;
        }
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(product);
        Some(Cart::from(items))
    }

    /// Returns a new cart where the entry `id` carries `amount`, keeping its
    /// position. `None` if the entry is absent.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Cart> {
        let index = self.items.iter().position(|p| p.id == id)?;
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, p)| if i == index { p.with_amount(amount) } else { p.clone() })
            .collect::<Vec<_>>();
        Some(Cart::from(items))
    }

    /// Returns a new cart without the entry `id`. `None` if the entry is absent.
    pub fn without(&self, id: ProductId) -> Option<Cart> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect::<Vec<_>>();
        Some(Cart::from(items))
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self.items.as_ref())
    }

    /// Parses a persisted snapshot.
    ///
    /// Snapshots holding zero amounts or duplicate ids are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Cart, CartDecodeError> {
        let items: Vec<Product> = serde_json::from_slice(bytes)?;
        let mut seen = HashSet::with_capacity(items.len());
        for product in &items {
            if product.amount == 0 {
                return Err(CartDecodeError::InvalidAmount(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CartDecodeError::DuplicateProduct(product.id));
            }
        }
        Ok(Cart::from(items))
    }
}
