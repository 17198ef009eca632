//! External collaborators of the watch job.
//!
//! The job only sees these traits; catalog, inventory and messaging systems
//! plug in behind them. The in-memory adapters here back the demo binary and
//! the tests.

pub mod inventory;
pub mod notifier;
pub mod wishlist;

pub use inventory::*;
pub use notifier::*;
pub use wishlist::*;
