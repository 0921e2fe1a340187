//! The cart controller actor: sole owner of the cart, processing one request
//! at a time.

mod controller;
pub mod error;
pub mod messages;

pub use controller::*;
pub use error::*;
pub use messages::*;
