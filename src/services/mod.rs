//! Collaborators the cart controller depends on: inventory queries,
//! snapshot persistence, and user-facing notifications.

pub mod inventory;
pub mod persistence;
pub mod notification;

pub use inventory::*;
pub use persistence::*;
pub use notification::*;
