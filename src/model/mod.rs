//! Plain data types that flow through a low-stock run.

pub mod inventory;
pub mod record;
pub mod wishlist;

pub use inventory::*;
pub use record::*;
pub use wishlist::*;
