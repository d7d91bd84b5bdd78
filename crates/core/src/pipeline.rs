//! The exchange pipeline: parse, reconcile, mutate.
//!
//! Runs synchronously within one upload request. There is no retry queue:
//! any failure surfaces as a single terminal error and the exporter is
//! expected to re-upload.

use crate::catalog::CatalogParser;
use crate::error::CoreError;
use crate::reconcile;
use crate::settings::AttributeMapping;
use crate::store::{CatalogStore, MutationFailure};

/// Counts reported after a successful exchange run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeSummary {
    /// Products parsed from the uploaded file.
    pub products: usize,
    pub created: usize,
    pub updated: usize,
}

/// Run the full exchange pipeline over one decompressed catalog payload.
///
/// Parses the batch, fetches the existing products for all parsed external
/// ids, partitions into create/update sets, and invokes the two bulk
/// mutations. Per-item failures reported by either mutation are aggregated
/// into a single [`CoreError::Mutation`]; the partial writes that did
/// succeed are not rolled back (last-write-wins on re-upload).
pub async fn run(
    bytes: &[u8],
    mapping: &AttributeMapping,
    parser: &dyn CatalogParser,
    catalog: &dyn CatalogStore,
) -> Result<ExchangeSummary, CoreError> {
    let batch = parser.parse(bytes)?;
    tracing::debug!(
        products = batch.products.len(),
        properties = batch.properties.len(),
        groups = batch.groups.len(),
        "Parsed catalog batch"
    );

    let external_ids: Vec<String> = batch
        .products
        .iter()
        .map(|product| product.id.clone())
        .collect();

    let existing = if external_ids.is_empty() {
        Vec::new()
    } else {
        catalog.find_by_external_ids(&external_ids).await?
    };

    let mutation = reconcile::reconcile(&batch.products, &batch.properties, mapping, &existing);
    let summary = ExchangeSummary {
        products: batch.products.len(),
        created: mutation.create.len(),
        updated: mutation.update.len(),
    };

    let mut failures: Vec<MutationFailure> = Vec::new();

    if !mutation.create.is_empty() {
        let outcome = catalog.create_many(mutation.create).await?;
        failures.extend(outcome.failures);
    }
    if !mutation.update.is_empty() {
        let outcome = catalog.update_many(mutation.update).await?;
        failures.extend(outcome.failures);
    }

    if !failures.is_empty() {
        let message = failures
            .iter()
            .map(MutationFailure::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CoreError::Mutation(message));
    }

    tracing::info!(
        products = summary.products,
        created = summary.created,
        updated = summary.updated,
        "Exchange pipeline completed"
    );
    Ok(summary)
}
