//! Line item intake, scoring orchestration, and the session inventory ledger.

pub(crate) mod assembler;
pub mod domain;
mod ledger;
pub mod repository;
pub mod router;
pub mod service;
mod validation;

#[cfg(test)]
mod tests;

pub use assembler::{assemble, build_breakdown};
pub use domain::{
    InventoryItem, InventoryItemId, InventorySummary, LineItemCandidate, LineItemInput,
};
pub use ledger::{InventoryLedger, LedgerError};
pub use repository::{InventoryRepository, RepositoryError};
pub use router::inventory_router;
pub use service::{
    ImportSummary, InventoryScoringService, InventoryServiceError, RetrievalPolicy, ScoringError,
};
pub use validation::ValidationError;
