use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tariff_risk::config::AppConfig;
use tariff_risk::error::AppError;
use tariff_risk::workflows::inventory::{
    InventoryItem, InventoryItemId, InventoryLedger, InventoryRepository, InventoryScoringService,
    RepositoryError,
};
use tariff_risk::workflows::signals::{ConfiguredSource, SignalSource};
use tracing::info;

pub(crate) type ConfiguredService =
    InventoryScoringService<ConfiguredSource, InMemoryInventoryRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Session inventory held in process memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryInventoryRepository {
    ledger: Arc<Mutex<InventoryLedger>>,
}

impl InMemoryInventoryRepository {
    fn ledger(&self) -> Result<MutexGuard<'_, InventoryLedger>, RepositoryError> {
        self.ledger
            .lock()
            .map_err(|_| RepositoryError::Unavailable("inventory mutex poisoned".to_string()))
    }
}

impl InventoryRepository for InMemoryInventoryRepository {
    fn epoch(&self) -> Result<u64, RepositoryError> {
        Ok(self.ledger()?.epoch())
    }

    fn append(&self, captured_epoch: u64, items: Vec<InventoryItem>) -> Result<usize, RepositoryError> {
        Ok(self.ledger()?.append(captured_epoch, items)?)
    }

    fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.ledger()?.items().to_vec())
    }

    fn fetch(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        Ok(self.ledger()?.get(id).cloned())
    }

    fn replace(&self, items: Vec<InventoryItem>) -> Result<u64, RepositoryError> {
        Ok(self.ledger()?.replace(items))
    }
}

/// Builds the scoring service with the configured signal source and an empty inventory.
pub(crate) fn inventory_service(config: &AppConfig) -> Result<ConfiguredService, AppError> {
    let source = ConfiguredSource::from_config(&config.signals)?;
    info!(
        source = source.source_tag(),
        policy = ?config.scoring.retrieval_policy,
        "signal source configured"
    );

    Ok(InventoryScoringService::from_config(
        Arc::new(source),
        Arc::new(InMemoryInventoryRepository::default()),
        &config.scoring,
    ))
}
