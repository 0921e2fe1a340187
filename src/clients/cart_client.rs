use tokio::sync::{mpsc, watch};

use crate::cart_controller::CartRequest;
use crate::domain::{Cart, ProductId, UpdateProductAmount};

/// Cloneable handle to a running cart controller.
///
/// Mutations go through the controller's mailbox and resolve to the committed
/// cart, or to the error the controller also reported as a notice. Reads can
/// use the latest published snapshot without queueing.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    snapshot: watch::Receiver<Cart>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>, snapshot: watch::Receiver<Cart>) -> Self {
        Self { sender, snapshot }
    }

    /// Latest committed cart.
    pub fn snapshot(&self) -> Cart {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is marked changed on every commit.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.snapshot.clone()
    }
}

client_method!(CartClient => fn add_product(product_id: ProductId) -> Cart as CartRequest::AddProduct);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> Cart as CartRequest::RemoveProduct);
client_method!(CartClient => fn update_product_amount(update: UpdateProductAmount) -> Cart as CartRequest::UpdateProductAmount);
client_method!(CartClient => fn cart() -> Cart as CartRequest::GetCart);
