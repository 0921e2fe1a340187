//! # Cart Actor
//!
//! Client-side shopping cart for a storefront, built as an actor.
//!
//! - **Domain types** - the cart snapshot and its entries → [`Cart`], [`Product`], [`StockRecord`]
//! - **Controller** - a single task owning the cart, applying add/remove/update
//!   requests one at a time → [`CartController`]
//! - **Client** - cloneable handle with instrumented request methods → [`CartClient`]
//! - **Collaborators** - inventory queries, snapshot persistence, user notices →
//!   [`InventoryService`], [`PersistenceStore`], [`NotificationSink`]
//! - **System** - wiring, configuration, tracing, shutdown → [`CartSystem`], [`load_settings`], [`setup_tracing`]
//!
//! ## Example Usage
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use cart_actor::*;
//! # async fn demo() -> Result<(), SystemError> {
//! let settings = load_settings(None)?;
//! let system = CartSystem::from_settings(&settings, Arc::new(TracingNotifier))?;
//!
//! // Failures are reported to the notifier and also returned here.
//! let _ = system.cart_client.add_product(3).await;
//! let _ = system.cart_client.update_product_amount(UpdateProductAmount::new(3, 2)).await;
//! println!("{} items", system.cart_client.snapshot().total_amount());
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod services;
pub mod cart_controller;
pub mod clients;
pub mod app_system;

#[cfg(test)]
mod mock_framework;

pub use domain::*;
pub use services::*;
pub use cart_controller::{CartController, CartError, CartRequest, Operation, DEFAULT_STORAGE_KEY};
pub use clients::CartClient;
pub use app_system::*;
