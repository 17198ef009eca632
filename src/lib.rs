#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Low-Stock Watch
//!
//! > **Tell customers when the things they wished for are running out.**
//!
//! This crate implements a periodic job that walks every wishlist entry, looks
//! up the current quantity of the wished-for SKU at each inventory source, and
//! records every source whose quantity is below a configured threshold.
//!
//! ## 🏗️ Design
//!
//! ### One run, one write
//! A run reads everything first and writes once. All findings of a run are
//! appended in a single batch after evaluation, so a run that fails halfway
//! leaves the store exactly as it found it.
//!
//! ### Explicit collaborators
//! Configuration, wishlists, inventory and messaging are traits passed into
//! the [`JobRunner`](job::JobRunner) constructor. There is no global state
//! and no service locator.
//!
//! ### The store is an actor
//! [`LowStockStore`](store::LowStockStore) is a cheap, cloneable handle to a
//! single task that owns the rows. Requests are processed one at a time, so the
//! storage backend needs no locks.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Wishlist entries, source quantities, draft and stored low-stock records.
//!
//! ### 2. The Decision ([`evaluator`])
//! The pure threshold comparison. A quantity is low iff it is strictly below
//! the threshold.
//!
//! ### 3. The Edges ([`config`], [`collaborators`])
//! The [`ConfigGate`](config::ConfigGate) and the wishlist, inventory and
//! notifier traits, with in-memory adapters.
//!
//! ### 4. The Store ([`store`])
//! Append-only persistence with a best-effort `flush`.
//!
//! ### 5. The Job ([`job`])
//! The run state machine: `Idle → Gated → Fetching → Evaluating → Persisting → Reporting → Done`,
//! or `Failed`.
//!
//! ### 6. The Service ([`lifecycle`])
//! [`WatchSystem`](lifecycle::WatchSystem) wiring, the periodic
//! [`Scheduler`](lifecycle::Scheduler), and tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # One run over the demo catalog
//! LOW_STOCK_ENABLE=1 RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod collaborators;
pub mod config;
pub mod evaluator;
pub mod job;
pub mod lifecycle;
pub mod model;
pub mod store;
