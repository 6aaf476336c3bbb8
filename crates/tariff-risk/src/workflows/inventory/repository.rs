use super::domain::{InventoryItem, InventoryItemId};
use super::ledger::LedgerError;

/// Storage abstraction so the scoring service can be exercised in isolation.
///
/// Implementations keep items in insertion order and honor the epoch contract of
/// [`super::InventoryLedger`].
pub trait InventoryRepository: Send + Sync {
    fn epoch(&self) -> Result<u64, RepositoryError>;
    fn append(&self, captured_epoch: u64, items: Vec<InventoryItem>) -> Result<usize, RepositoryError>;
    fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError>;
    fn fetch(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError>;
    fn replace(&self, items: Vec<InventoryItem>) -> Result<u64, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Stale(#[from] LedgerError),
    #[error("inventory item not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
