//! Catalog store collaborator seam.
//!
//! The store owns persistence of products: lookup by external identifier
//! and the two bulk mutations the reconciliation output feeds. Mutations
//! may report partial per-item failure; the exchange pipeline treats any
//! reported failure as an upload failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reconcile::ProductDto;

/// An existing catalog entry, as much of it as reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingProduct {
    /// Internal catalog id.
    pub id: String,
    /// Exporter-assigned external identifier.
    pub external_id: String,
}

/// One failed item of a bulk mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationFailure {
    pub external_id: String,
    pub message: String,
}

impl std::fmt::Display for MutationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.external_id, self.message)
    }
}

/// Result of one bulk mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    pub succeeded: usize,
    pub failures: Vec<MutationFailure>,
}

impl MutationOutcome {
    pub fn all_succeeded(succeeded: usize) -> Self {
        Self {
            succeeded,
            failures: Vec::new(),
        }
    }
}

/// Catalog mutation collaborator.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up existing products by external identifier. Ids with no match
    /// are simply absent from the result.
    async fn find_by_external_ids(
        &self,
        external_ids: &[String],
    ) -> Result<Vec<ExistingProduct>, CoreError>;

    /// Create the given products. Every DTO carries no internal id.
    async fn create_many(&self, products: Vec<ProductDto>) -> Result<MutationOutcome, CoreError>;

    /// Update the given products. Every DTO carries the matched internal
    /// id.
    async fn update_many(&self, products: Vec<ProductDto>) -> Result<MutationOutcome, CoreError>;
}
