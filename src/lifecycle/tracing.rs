//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the whole service.
//!
//! ## What Gets Traced
//!
//! - **Run lifecycle**: every state transition (`debug`) and the run summary (`info`)
//! - **Skipped entries**: unknown SKUs with the customer that wished for them (`warn`)
//! - **Store actor**: startup, appends, flushes and shutdown
//! - **Failures**: the failing stage and error of a run (`error`)
//!
//! ## Usage
//!
//! ```bash
//! # Run summaries only
//! RUST_LOG=info cargo run
//!
//! # Transitions and per-entry evaluation
//! RUST_LOG=debug cargo run
//!
//! # Only the runner
//! RUST_LOG=low_stock_watch::job=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a run looks like:
//!
//! ```text
//! INFO Store actor started
//! INFO run: Appended rows=2
//! INFO run: Run complete examined=3 skipped=1 persisted=2
//! INFO run: 2 wishlist item(s) are low on stock (template low_stock_wishlist) count=2
//! ```

/// Initializes the tracing subscriber.
///
/// Log levels come from `RUST_LOG`. Must be called at most once per process.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
