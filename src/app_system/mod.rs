//! System wiring, configuration, startup, and shutdown.

pub mod cart_system;
pub mod config;
pub mod telemetry;
pub mod error;

pub use cart_system::*;
pub use config::*;
pub use telemetry::*;
pub use error::*;
