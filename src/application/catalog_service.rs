// Catalog service - Use case for listing trackable entities
use crate::domain::catalog::{CatalogEntry, EntityCatalog};
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<EntityCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<EntityCatalog>) -> Self {
        Self { catalog }
    }

    pub fn list_entities(&self) -> Vec<CatalogEntry> {
        self.catalog.entries().to_vec()
    }
}
