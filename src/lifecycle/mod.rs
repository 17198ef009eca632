//! # Service Lifecycle
//!
//! Wiring, scheduling and observability for the watch.
//!
//! - [`WatchSystem`] - spawns the store actor, builds the runner, shuts down cleanly
//! - [`Scheduler`] - periodic, non-overlapping runs
//! - [`setup_tracing`] - logging initialization
//!
//! ## Shutdown order
//!
//! 1. Stop the scheduler (send `true` on its stop channel) and await its task
//! 2. Call [`WatchSystem::shutdown`], which drops the last store clients and
//!    waits for the store actor to drain

pub mod scheduler;
pub mod tracing;
pub mod watch_system;

pub use scheduler::*;
pub use self::tracing::*;
pub use watch_system::*;
