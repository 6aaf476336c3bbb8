//! Bulk CSV ingestion of inventory line items.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::workflows::inventory::LineItemInput;
use crate::workflows::risk::QuantityUnit;

/// File-level failure; no row of the batch is scored.
#[derive(Debug, thiserror::Error)]
pub enum BatchFormatError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("file has no data rows")]
    NoDataRows,
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read inventory file: {0}")]
    Io(#[from] std::io::Error),
}

/// Validated rows of one file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub rows: Vec<LineItemInput>,
    /// Rows dropped by validation.
    pub skipped: usize,
}

pub struct InventoryImporter;

impl InventoryImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        default_unit: &QuantityUnit,
    ) -> Result<ImportBatch, BatchFormatError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, default_unit)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        default_unit: &QuantityUnit,
    ) -> Result<ImportBatch, BatchFormatError> {
        let parsed = parser::parse_candidates(reader)?;
        let mut rows = Vec::new();
        let mut skipped = parsed.undecodable;

        for (row, candidate) in parsed.candidates {
            match candidate.validate_with_default(default_unit) {
                Ok(input) => rows.push(input),
                Err(error) => {
                    debug!(row, %error, "skipping invalid inventory row");
                    skipped += 1;
                }
            }
        }

        Ok(ImportBatch { rows, skipped })
    }
}
