//! The low-stock watch job: run states, errors, and the [`JobRunner`].

pub mod error;
pub mod runner;
pub mod state;

pub use error::*;
pub use runner::*;
pub use state::*;
