use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::inventory::domain::{InventoryItem, InventoryItemId, LineItemCandidate};
use crate::workflows::inventory::ledger::InventoryLedger;
use crate::workflows::inventory::repository::{InventoryRepository, RepositoryError};
use crate::workflows::inventory::{InventoryScoringService, RetrievalPolicy};
use crate::workflows::risk::{Evidence, SignalResult};
use crate::workflows::signals::{SignalError, SignalSource};

pub(super) fn steel_candidate() -> LineItemCandidate {
    LineItemCandidate::new("Steel", "Manufacturing", "China", "500").with_unit("ton")
}

pub(super) fn flagged(count: usize) -> SignalResult {
    let evidence = (0..count)
        .map(|index| {
            Evidence::new(
                format!("Tariff hike announced {index}"),
                format!("https://news.test/{index}"),
            )
        })
        .collect();
    SignalResult::from_flags(evidence, 0..count)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    ledger: Mutex<InventoryLedger>,
}

impl InventoryRepository for MemoryRepository {
    fn epoch(&self) -> Result<u64, RepositoryError> {
        Ok(self.ledger.lock().unwrap().epoch())
    }

    fn append(&self, captured_epoch: u64, items: Vec<InventoryItem>) -> Result<usize, RepositoryError> {
        Ok(self.ledger.lock().unwrap().append(captured_epoch, items)?)
    }

    fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.ledger.lock().unwrap().items().to_vec())
    }

    fn fetch(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        Ok(self.ledger.lock().unwrap().get(id).cloned())
    }

    fn replace(&self, items: Vec<InventoryItem>) -> Result<u64, RepositoryError> {
        Ok(self.ledger.lock().unwrap().replace(items))
    }
}

pub(super) struct UnavailableRepository;

impl InventoryRepository for UnavailableRepository {
    fn epoch(&self) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn append(&self, _captured_epoch: u64, _items: Vec<InventoryItem>) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn replace(&self, _items: Vec<InventoryItem>) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

/// Answers known queries from a table and everything else with a fallback result.
pub(super) struct FixedSource {
    answers: HashMap<String, SignalResult>,
    fallback: SignalResult,
    calls: AtomicUsize,
}

impl FixedSource {
    pub(super) fn uniform(result: SignalResult) -> Self {
        Self {
            answers: HashMap::new(),
            fallback: result,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn with(mut self, query: &str, result: SignalResult) -> Self {
        self.answers.insert(query.to_string(), result);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalSource for FixedSource {
    fn source_tag(&self) -> &'static str {
        "fixed"
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .answers
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Fails every query whose text contains the marker and answers the rest with no news.
pub(super) struct FailingSource {
    marker: &'static str,
}

impl FailingSource {
    pub(super) fn matching(marker: &'static str) -> Self {
        Self { marker }
    }

    pub(super) fn always() -> Self {
        Self { marker: "" }
    }
}

#[async_trait]
impl SignalSource for FailingSource {
    fn source_tag(&self) -> &'static str {
        "failing"
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError> {
        if query.contains(self.marker) {
            Err(SignalError::Transport("connection refused".to_string()))
        } else {
            Ok(SignalResult::from_flags(Vec::new(), []))
        }
    }
}

/// Delays each query by the millisecond count found after `delay:` in the item name.
pub(super) struct DelayedSource;

#[async_trait]
impl SignalSource for DelayedSource {
    fn source_tag(&self) -> &'static str {
        "delayed"
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError> {
        let millis = query
            .split_whitespace()
            .find_map(|word| word.strip_prefix("delay:"))
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(flagged(1))
    }
}

/// Clears the repository while the first query is in flight.
pub(super) struct ResettingSource {
    pub(super) repository: Arc<MemoryRepository>,
}

#[async_trait]
impl SignalSource for ResettingSource {
    fn source_tag(&self) -> &'static str {
        "resetting"
    }

    async fn resolve(&self, _query: &str) -> Result<SignalResult, SignalError> {
        self.repository
            .replace(Vec::new())
            .map_err(|error| SignalError::Transport(error.to_string()))?;
        Ok(flagged(1))
    }
}

pub(super) fn build_service(
    source: FixedSource,
) -> (
    InventoryScoringService<FixedSource, MemoryRepository>,
    Arc<FixedSource>,
    Arc<MemoryRepository>,
) {
    let source = Arc::new(source);
    let repository = Arc::new(MemoryRepository::default());
    let service =
        InventoryScoringService::new(source.clone(), repository.clone(), RetrievalPolicy::Substitute);
    (service, source, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
