//! In-memory catalog store.
//!
//! Keyed by external identifier; internal ids are assigned sequentially on
//! create. Non-persistent: intended for demos and tests, not production.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use onec_bridge_core::error::CoreError;
use onec_bridge_core::reconcile::ProductDto;
use onec_bridge_core::store::{CatalogStore, ExistingProduct, MutationFailure, MutationOutcome};

/// One stored catalog entry.
#[derive(Debug, Clone)]
pub struct StoredProduct {
    /// Internal catalog id.
    pub id: String,
    pub dto: ProductDto,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    /// external_id -> stored product. Last write wins.
    products: RwLock<HashMap<String, StoredProduct>>,
    next_id: AtomicU64,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("prod_{n:05}")
    }

    /// Insert a minimal product directly, returning its internal id.
    /// Test/demo seeding helper.
    pub async fn seed(&self, external_id: &str, title: &str) -> String {
        let id = self.allocate_id();
        let dto = ProductDto {
            id: None,
            external_id: external_id.to_string(),
            title: title.to_string(),
            handle: onec_bridge_core::handle::handle_from_name(title),
            description: None,
            options: Vec::new(),
            variants: Vec::new(),
            metadata: Default::default(),
            attributes: Default::default(),
        };
        self.products.write().await.insert(
            external_id.to_string(),
            StoredProduct {
                id: id.clone(),
                dto,
            },
        );
        id
    }

    /// Snapshot of all stored products, for assertions.
    pub async fn all(&self) -> Vec<StoredProduct> {
        self.products.read().await.values().cloned().collect()
    }

    /// Look up one stored product by external id.
    pub async fn get(&self, external_id: &str) -> Option<StoredProduct> {
        self.products.read().await.get(external_id).cloned()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_by_external_ids(
        &self,
        external_ids: &[String],
    ) -> Result<Vec<ExistingProduct>, CoreError> {
        let products = self.products.read().await;
        Ok(external_ids
            .iter()
            .filter_map(|external_id| products.get(external_id))
            .map(|stored| ExistingProduct {
                id: stored.id.clone(),
                external_id: stored.dto.external_id.clone(),
            })
            .collect())
    }

    async fn create_many(&self, dtos: Vec<ProductDto>) -> Result<MutationOutcome, CoreError> {
        let mut products = self.products.write().await;
        let count = dtos.len();
        for dto in dtos {
            let id = self.allocate_id();
            products.insert(dto.external_id.clone(), StoredProduct { id, dto });
        }
        Ok(MutationOutcome::all_succeeded(count))
    }

    async fn update_many(&self, dtos: Vec<ProductDto>) -> Result<MutationOutcome, CoreError> {
        let mut products = self.products.write().await;
        let mut outcome = MutationOutcome::default();

        for dto in dtos {
            let Some(internal_id) = dto.id.clone() else {
                outcome.failures.push(MutationFailure {
                    external_id: dto.external_id.clone(),
                    message: "update without internal id".into(),
                });
                continue;
            };

            let known = products
                .values()
                .any(|stored| stored.id == internal_id);
            if !known {
                outcome.failures.push(MutationFailure {
                    external_id: dto.external_id.clone(),
                    message: format!("no product with id {internal_id}"),
                });
                continue;
            }

            // The external id is the authoritative key; re-keying on update
            // keeps last-write-wins semantics.
            products.retain(|_, stored| stored.id != internal_id);
            products.insert(
                dto.external_id.clone(),
                StoredProduct {
                    id: internal_id,
                    dto,
                },
            );
            outcome.succeeded += 1;
        }

        Ok(outcome)
    }
}
