use super::domain::{InventoryItem, InventoryItemId, InventorySummary};

/// Append-only ordered collection of scored items for one session.
///
/// The epoch advances whenever the whole content is replaced; work that captured an
/// older epoch can no longer append.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    items: Vec<InventoryItem>,
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("inventory was replaced (epoch {current}) while work from epoch {captured} was in flight")]
    StaleEpoch { captured: u64, current: u64 },
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn append(
        &mut self,
        captured_epoch: u64,
        items: impl IntoIterator<Item = InventoryItem>,
    ) -> Result<usize, LedgerError> {
        if captured_epoch != self.epoch {
            return Err(LedgerError::StaleEpoch {
                captured: captured_epoch,
                current: self.epoch,
            });
        }

        let before = self.items.len();
        self.items.extend(items);
        Ok(self.items.len() - before)
    }

    /// Swaps in new content and returns the new epoch.
    pub fn replace(&mut self, items: Vec<InventoryItem>) -> u64 {
        self.items = items;
        self.epoch += 1;
        self.epoch
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, id: &InventoryItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary::from_items(&self.items)
    }
}
