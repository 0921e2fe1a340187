use tokio::sync::oneshot;

use crate::domain::{Cart, ProductId, UpdateProductAmount};
use super::CartError;

pub type CartResult<T> = std::result::Result<T, CartError>;
pub type CartResponse<T> = oneshot::Sender<CartResult<T>>;

/// Requests handled by the cart controller. Each carries a oneshot channel
/// for the reply.
#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: ProductId,
        respond_to: CartResponse<Cart>,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: CartResponse<Cart>,
    },
    UpdateProductAmount {
        update: UpdateProductAmount,
        respond_to: CartResponse<Cart>,
    },
    GetCart {
        respond_to: CartResponse<Cart>,
    },
}
