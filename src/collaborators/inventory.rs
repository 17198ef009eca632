use crate::model::SourceQuantity;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors raised by an inventory lookup.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// The SKU is not in the catalog. The runner skips the entry.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The inventory backend failed. Fatal for the run.
    #[error("Inventory source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies current quantities per SKU and source.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Quantities of `sku` at every known source, in source order.
    ///
    /// A catalog product with no sources yields an empty list, not an error.
    async fn quantities_for(&self, sku: &str) -> Result<Vec<SourceQuantity>, InventoryError>;
}

#[derive(Debug, Default)]
struct Catalog {
    products: HashSet<String>,
    quantities: HashMap<String, Vec<SourceQuantity>>,
}

/// Catalog and stock levels held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product with no sources.
    pub fn add_product(&self, sku: impl Into<String>) -> Result<(), InventoryError> {
        self.catalog
            .write()
            .map_err(|_| poisoned())?
            .products
            .insert(sku.into());
        Ok(())
    }

    /// Sets the quantity of `sku` at `source`, registering the product if needed.
    ///
    /// A source that already has a reading keeps its position.
    pub fn set_quantity(
        &self,
        sku: impl Into<String>,
        source: impl Into<String>,
        quantity: f64,
    ) -> Result<(), InventoryError> {
        let sku = sku.into();
        let reading = SourceQuantity::new(sku.clone(), source, quantity);

        let mut catalog = self.catalog.write().map_err(|_| poisoned())?;
        catalog.products.insert(sku.clone());
        let readings = catalog.quantities.entry(sku).or_default();
        match readings
            .iter_mut()
            .find(|r| r.source_name == reading.source_name)
        {
            Some(existing) => *existing = reading,
            None => readings.push(reading),
        }
        Ok(())
    }

    /// Removes a product and its readings from the catalog.
    pub fn remove_product(&self, sku: &str) -> Result<(), InventoryError> {
        let mut catalog = self.catalog.write().map_err(|_| poisoned())?;
        catalog.products.remove(sku);
        catalog.quantities.remove(sku);
        Ok(())
    }
}

fn poisoned() -> InventoryError {
    InventoryError::Unavailable("inventory lock poisoned".to_string())
}

#[async_trait]
impl InventorySource for InMemoryInventory {
    async fn quantities_for(&self, sku: &str) -> Result<Vec<SourceQuantity>, InventoryError> {
        let catalog = self.catalog.read().map_err(|_| poisoned())?;
        if !catalog.products.contains(sku) {
            return Err(InventoryError::ProductNotFound(sku.to_string()));
        }
        Ok(catalog.quantities.get(sku).cloned().unwrap_or_default())
    }
}
