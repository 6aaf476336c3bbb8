use std::io::Read;

use tracing::debug;

use super::normalizer::normalize_header;
use super::BatchFormatError;
use crate::workflows::inventory::LineItemCandidate;

const ITEM_NAME: &str = "item name";
const INDUSTRY: &str = "industry";
const LEGACY_INDUSTRY: &str = "category";
const ORIGIN_COUNTRY: &str = "origin country";
const QUANTITY: &str = "quantity";
const UNIT: &str = "unit";

/// Cell positions of the recognized columns in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnIndex {
    item_name: usize,
    industry: usize,
    origin_country: usize,
    quantity: usize,
    unit: Option<usize>,
}

impl ColumnIndex {
    pub(crate) fn from_headers<'a>(
        headers: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, BatchFormatError> {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let position = |name: &str| normalized.iter().position(|header| header == name);

        let item_name = position(ITEM_NAME);
        let industry = position(INDUSTRY).or_else(|| position(LEGACY_INDUSTRY));
        let origin_country = position(ORIGIN_COUNTRY);
        let quantity = position(QUANTITY);

        match (item_name, industry, origin_country, quantity) {
            (Some(item_name), Some(industry), Some(origin_country), Some(quantity)) => Ok(Self {
                item_name,
                industry,
                origin_country,
                quantity,
                unit: position(UNIT),
            }),
            _ => {
                let missing = [
                    (ITEM_NAME, item_name),
                    (INDUSTRY, industry),
                    (ORIGIN_COUNTRY, origin_country),
                    (QUANTITY, quantity),
                ]
                .into_iter()
                .filter(|(_, found)| found.is_none())
                .map(|(name, _)| name)
                .collect();
                Err(BatchFormatError::MissingColumns(missing))
            }
        }
    }

    fn candidate(&self, record: &csv::StringRecord) -> LineItemCandidate {
        let cell = |index: usize| record.get(index).unwrap_or_default().to_string();
        LineItemCandidate {
            item_name: cell(self.item_name),
            industry: cell(self.industry),
            origin_country: cell(self.origin_country),
            quantity: cell(self.quantity),
            unit: self
                .unit
                .and_then(|index| record.get(index))
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        }
    }
}

/// Data rows of one file, in file order.
#[derive(Debug)]
pub(crate) struct ParsedRows {
    /// 1-based file row number (the header is row 1) paired with its cells.
    pub(crate) candidates: Vec<(usize, LineItemCandidate)>,
    /// Rows whose bytes are not valid UTF-8.
    pub(crate) undecodable: usize,
}

/// Reads the header row and every data row; rows may be shorter than the header.
pub(crate) fn parse_candidates<R: Read>(reader: R) -> Result<ParsedRows, BatchFormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.byte_records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(BatchFormatError::NoDataRows),
    };
    // Undecodable header bytes never match a column name and surface as missing columns.
    let header_cells: Vec<String> = header
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect();
    let columns = ColumnIndex::from_headers(header_cells.iter().map(String::as_str))?;

    let mut candidates = Vec::new();
    let mut undecodable = 0;
    for (offset, record) in records.enumerate() {
        let row = offset + 2;
        match csv::StringRecord::from_byte_record(record?) {
            Ok(record) => candidates.push((row, columns.candidate(&record))),
            Err(error) => {
                debug!(row, %error, "skipping row that is not valid UTF-8");
                undecodable += 1;
            }
        }
    }

    if candidates.is_empty() && undecodable == 0 {
        return Err(BatchFormatError::NoDataRows);
    }

    Ok(ParsedRows {
        candidates,
        undecodable,
    })
}
