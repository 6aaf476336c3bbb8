use std::io::Read;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info};

use super::assembler::{assemble_breakdown, build_breakdown};
use super::domain::{
    InventoryItem, InventoryItemId, InventorySummary, LineItemCandidate, LineItemInput,
};
use super::repository::{InventoryRepository, RepositoryError};
use super::validation::ValidationError;
use crate::config::ScoringConfig;
use crate::workflows::import::{BatchFormatError, InventoryImporter};
use crate::workflows::risk::{quantity_risk, signal_risk, QuantityUnit, RiskBreakdown, SignalResult};
use crate::workflows::signals::{SignalError, SignalQueries, SignalSource};

/// How a failed signal lookup affects the item being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalPolicy {
    /// The failed signal contributes an unavailable zero result.
    #[default]
    Substitute,
    /// Any failed signal aborts the item.
    Abort,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub items: Vec<InventoryItem>,
}

/// Service composing the signal source, the quantity band, and the inventory store.
pub struct InventoryScoringService<S, R> {
    source: Arc<S>,
    repository: Arc<R>,
    policy: RetrievalPolicy,
    import_concurrency: usize,
}

impl<S, R> InventoryScoringService<S, R>
where
    S: SignalSource + 'static,
    R: InventoryRepository + 'static,
{
    pub fn new(source: Arc<S>, repository: Arc<R>, policy: RetrievalPolicy) -> Self {
        Self {
            source,
            repository,
            policy,
            import_concurrency: ScoringConfig::default().import_concurrency,
        }
    }

    pub fn from_config(source: Arc<S>, repository: Arc<R>, config: &ScoringConfig) -> Self {
        Self::new(source, repository, config.retrieval_policy)
            .with_import_concurrency(config.import_concurrency)
    }

    pub fn with_import_concurrency(mut self, limit: usize) -> Self {
        self.import_concurrency = limit.max(1);
        self
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn policy(&self) -> RetrievalPolicy {
        self.policy
    }

    /// Resolve the three signals concurrently and aggregate them with the quantity band.
    pub async fn score(&self, input: &LineItemInput) -> Result<RiskBreakdown, ScoringError> {
        let queries =
            SignalQueries::for_attributes(&input.item_name, &input.industry, &input.origin_country);

        let (country, item, industry) = tokio::join!(
            self.resolve(&queries.country),
            self.resolve(&queries.item),
            self.resolve(&queries.industry),
        );
        let quantity = quantity_risk(input.quantity, &input.unit);

        Ok(build_breakdown(country?, item?, industry?, quantity))
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, ScoringError> {
        match self.policy {
            RetrievalPolicy::Substitute => Ok(signal_risk(self.source.as_ref(), query).await),
            RetrievalPolicy::Abort => {
                self.source
                    .resolve(query)
                    .await
                    .map_err(|source| ScoringError::Retrieval {
                        query: query.to_string(),
                        source,
                    })
            }
        }
    }

    /// Validate, score, and record one manually entered line item.
    pub async fn submit(
        &self,
        candidate: LineItemCandidate,
    ) -> Result<InventoryItem, InventoryServiceError> {
        let input = candidate.validate()?;
        let epoch = self.repository.epoch()?;

        let breakdown = self.score(&input).await?;
        let item = assemble_breakdown(&input, breakdown);

        self.repository.append(epoch, vec![item.clone()])?;
        info!(
            item_id = %item.id,
            final_score = item.final_score(),
            level = %item.level(),
            "inventory item scored"
        );
        Ok(item)
    }

    /// Parse a CSV batch, score every valid row, and append the results in row order.
    pub async fn import<Rd: Read>(
        &self,
        reader: Rd,
        default_unit: &QuantityUnit,
    ) -> Result<ImportSummary, InventoryServiceError> {
        let batch = InventoryImporter::from_reader(reader, default_unit)?;
        let epoch = self.repository.epoch()?;
        let mut skipped = batch.skipped;

        let service = self;
        let outcomes: Vec<(LineItemInput, Result<RiskBreakdown, ScoringError>)> =
            stream::iter(batch.rows)
                .map(|input| async move {
                    let outcome = service.score(&input).await;
                    (input, outcome)
                })
                .buffered(self.import_concurrency)
                .collect()
                .await;

        let mut items = Vec::with_capacity(outcomes.len());
        for (input, outcome) in outcomes {
            match outcome {
                Ok(breakdown) => items.push(assemble_breakdown(&input, breakdown)),
                Err(error) => {
                    debug!(item = %input.item_name, %error, "skipping row after scoring failure");
                    skipped += 1;
                }
            }
        }

        let imported = self.repository.append(epoch, items.clone())?;
        info!(imported, skipped, "inventory batch imported");

        Ok(ImportSummary {
            imported,
            skipped,
            items,
        })
    }

    pub fn list(&self) -> Result<Vec<InventoryItem>, InventoryServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn get(&self, id: &InventoryItemId) -> Result<InventoryItem, InventoryServiceError> {
        let item = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(item)
    }

    /// Clear the inventory; in-flight work that captured the old epoch can no longer append.
    pub fn reset(&self) -> Result<u64, InventoryServiceError> {
        let epoch = self.repository.replace(Vec::new())?;
        info!(epoch, "inventory reset");
        Ok(epoch)
    }

    pub fn summary(&self) -> Result<InventorySummary, InventoryServiceError> {
        Ok(InventorySummary::from_items(&self.repository.list()?))
    }
}

/// Scoring failure under [`RetrievalPolicy::Abort`].
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("signal retrieval failed for '{query}': {source}")]
    Retrieval { query: String, source: SignalError },
}

/// Error raised by the inventory scoring service.
#[derive(Debug, thiserror::Error)]
pub enum InventoryServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    BatchFormat(#[from] BatchFormatError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
