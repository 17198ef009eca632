//! # Low-Stock Watch Demo
//!
//! Runs the job once against a small in-memory catalog.
//!
//! Settings come from `LOW_STOCK_CONFIG` (default `low_stock.yaml`) and the
//! `LOW_STOCK_*` environment overrides. Set `LOW_STOCK_FLUSH=1` to clear the
//! store after the run.

use low_stock_watch::collaborators::{InMemoryInventory, InMemoryWishlist, LogNotifier};
use low_stock_watch::config::{ConfigGate, Settings, StaticConfigGate};
use low_stock_watch::lifecycle::{setup_tracing, Collaborators, WatchSystem};
use low_stock_watch::model::WishlistEntry;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info, Instrument};

fn demo_catalog() -> Result<(InMemoryWishlist, InMemoryInventory), Box<dyn Error>> {
    let inventory = InMemoryInventory::new();
    inventory.set_quantity("MUG-BLUE", "default", 3.0)?;
    inventory.set_quantity("MUG-BLUE", "eu_warehouse", 12.0)?;
    inventory.set_quantity("TEE-M", "default", 5.0)?;
    inventory.set_quantity("TEE-L", "default", 0.0)?;
    inventory.set_quantity("TEE-L", "eu_warehouse", 1.0)?;
    inventory.add_product("GIFT-CARD")?;

    let wishlist = InMemoryWishlist::new(vec![
        WishlistEntry::new(1, "MUG-BLUE", 101),
        WishlistEntry::new(1, "TEE-M", 101),
        WishlistEntry::new(2, "TEE-L", 102),
        WishlistEntry::new(2, "GIFT-CARD", 102),
        WishlistEntry::new(3, "DISCONTINUED-HAT", 103),
    ]);

    Ok((wishlist, inventory))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_tracing();

    let settings = Settings::load()?;
    info!(enable = settings.module.enable, threshold = settings.module.threshold, "Settings loaded");

    let (wishlist, inventory) = demo_catalog()?;
    let config: Arc<dyn ConfigGate> = Arc::new(StaticConfigGate::new(settings.module.clone()));
    let collaborators = Collaborators {
        config,
        wishlist: Arc::new(wishlist),
        inventory: Arc::new(inventory),
        notifier: Arc::new(LogNotifier),
    };

    let system = WatchSystem::from_settings(&settings, collaborators).await?;

    let span = tracing::info_span!("low_stock_run");
    match system.runner.run().instrument(span).await {
        Ok(report) => info!(
            outcome = ?report.outcome,
            examined = report.entries_examined,
            skipped = ?report.skipped,
            persisted = report.records_persisted,
            "Run finished"
        ),
        Err(e) => error!(stage = %e.stage(), error = %e, "Run failed"),
    }

    for record in system.store.list_all().await? {
        info!(
            row = %record.row_id,
            customer = %record.customer_id,
            sku = %record.sku,
            source = %record.source_name,
            qty = record.source_qty,
            "Low stock"
        );
    }

    if std::env::var("LOW_STOCK_FLUSH").is_ok_and(|v| v == "1") {
        let flushed = system.store.flush().await;
        info!(flushed, "Store flush requested");
    }

    system.shutdown().await?;

    info!("Demo completed");
    Ok(())
}
