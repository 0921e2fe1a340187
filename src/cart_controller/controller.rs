use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::clients::CartClient;
use crate::domain::{Cart, Product, ProductId, StockRecord, UpdateProductAmount};
use crate::services::{InventoryService, Notice, NotificationSink, PersistenceStore};
use super::{CartError, CartRequest, CartResponse, CartResult, Operation};

/// Key under which the cart snapshot is persisted unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "storefront:cart";

/// Owns the cart and applies add/remove/update requests one at a time.
///
/// Requests are drained from the mailbox sequentially and each one, including
/// its inventory queries, completes before the next is dequeued. Every commit
/// is persisted and then published to the client's snapshot view.
pub struct CartController {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    inventory: Arc<dyn InventoryService>,
    store: Arc<dyn PersistenceStore>,
    notifier: Arc<dyn NotificationSink>,
    storage_key: String,
    published: watch::Sender<Cart>,
}

impl CartController {
    pub fn new(
        buffer_size: usize,
        storage_key: impl Into<String>,
        inventory: Arc<dyn InventoryService>,
        store: Arc<dyn PersistenceStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> (Self, CartClient) {
        let storage_key = storage_key.into();
        let cart = load_snapshot(store.as_ref(), &storage_key);

        let (sender, receiver) = mpsc::channel(buffer_size);
        let (published, snapshot) = watch::channel(cart.clone());
        let controller = Self {
            receiver,
            cart,
            inventory,
            store,
            notifier,
            storage_key,
            published,
        };
        let client = CartClient::new(sender, snapshot);
        (controller, client)
    }

    #[instrument(name = "cart_controller", skip(self))]
    pub async fn run(mut self) {
        info!(items = self.cart.len(), "CartController starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to).await;
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to);
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    self.handle_update_product_amount(update, respond_to).await;
                }
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.clone()));
                }
            }
        }

        info!("CartController stopped");
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_add_product(&mut self, product_id: ProductId, respond_to: CartResponse<Cart>) {
        debug!("Processing add_product request");
        let (operation, result) = self.add_product(product_id).await;
        self.reply(operation, result, respond_to);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_remove_product(&mut self, product_id: ProductId, respond_to: CartResponse<Cart>) {
        debug!("Processing remove_product request");
        let result = match self.cart.without(product_id) {
            Some(cart) => Ok(self.commit(cart)),
            None => Err(CartError::NotFound(product_id)),
        };
        self.reply(Operation::Remove, result, respond_to);
    }

    #[instrument(fields(product_id = %update.product_id, amount = update.amount), skip(self, respond_to))]
    async fn handle_update_product_amount(&mut self, update: UpdateProductAmount, respond_to: CartResponse<Cart>) {
        debug!("Processing update_product_amount request");
        let result = self.update_product_amount(update).await;
        self.reply(Operation::Update, result, respond_to);
    }

    /// Adds one unit of a product.
    ///
    /// A product already in the cart is delegated to the update path with its
    /// amount plus one, so failures there are reported as update failures.
    async fn add_product(&mut self, product_id: ProductId) -> (Operation, CartResult<Cart>) {
        // Any failed stock lookup counts as the product not existing.
        let stock = match self.inventory.get_stock(product_id).await {
            Ok(stock) => stock,
            Err(e) => {
                debug!(error = %e, "Stock lookup failed");
                return (Operation::Add, Err(CartError::NotFound(product_id)));
            }
        };

        if let Some(existing) = self.cart.get(product_id) {
            let Some(amount) = existing.amount.checked_add(1) else {
                return (Operation::Update, Err(CartError::OutOfStock { requested: u32::MAX, available: stock.amount }));
            };
            let update = UpdateProductAmount::new(product_id, amount);
            return (Operation::Update, self.update_product_amount(update).await);
        }

        (Operation::Add, self.append_product(product_id, stock).await)
    }

    async fn append_product(&mut self, product_id: ProductId, stock: StockRecord) -> CartResult<Cart> {
        if !stock.covers(1) {
            return Err(CartError::OutOfStock { requested: 1, available: stock.amount });
        }

        let item = self.inventory.get_product(product_id).await?;
        if item.id != product_id {
            return Err(CartError::Transport(format!(
                "Catalog returned product {} for product {}",
                item.id, product_id
            )));
        }
        let cart = self
            .cart
            .with_product(Product::from_catalog(item, 1))
            .ok_or_else(|| CartError::Transport(format!("Catalog returned a product already in the cart: {}", product_id)))?;

        info!("Product added to cart");
        Ok(self.commit(cart))
    }

    async fn update_product_amount(&mut self, update: UpdateProductAmount) -> CartResult<Cart> {
        let UpdateProductAmount { product_id, amount } = update;

        if amount < 1 {
            return Err(CartError::InvalidAmount(amount));
        }
        if !self.cart.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let stock = self.inventory.get_stock(product_id).await?;
        if !stock.covers(amount) {
            return Err(CartError::OutOfStock { requested: amount, available: stock.amount });
        }

        let cart = self
            .cart
            .with_amount(product_id, amount)
            .ok_or(CartError::NotFound(product_id))?;

        info!("Product amount updated");
        Ok(self.commit(cart))
    }

    /// Installs `cart` as the current state, persists it, and publishes it.
    fn commit(&mut self, cart: Cart) -> Cart {
        self.cart = cart.clone();
        self.persist();
        self.published.send_replace(cart.clone());
        cart
    }

    fn persist(&self) {
        let bytes = match self.cart.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key, &bytes) {
            warn!(error = %e, key = %self.storage_key, "Failed to persist cart snapshot");
        }
    }

    fn reply(&self, operation: Operation, result: CartResult<Cart>, respond_to: CartResponse<Cart>) {
        if let Err(e) = &result {
            warn!(error = %e, ?operation, "Cart operation failed");
            self.notifier.notify(Notice::for_failure(operation, e));
        }
        let _ = respond_to.send(result);
    }
}

/// Reads the persisted snapshot. Missing, unreadable or malformed snapshots
/// yield an empty cart.
fn load_snapshot(store: &dyn PersistenceStore, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(bytes)) => match Cart::decode(&bytes) {
            Ok(cart) => {
                debug!(items = cart.len(), "Restored cart snapshot");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unusable cart snapshot");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read cart snapshot");
            Cart::new()
        }
    }
}
