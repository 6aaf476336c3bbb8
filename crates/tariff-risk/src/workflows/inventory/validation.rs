use super::domain::{LineItemCandidate, LineItemInput};
use crate::workflows::risk::QuantityUnit;

/// Row or submission rejected by the required-field and numeric checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("quantity '{0}' is not a finite number")]
    InvalidQuantity(String),
    #[error("quantity must not be negative (got {0})")]
    NegativeQuantity(String),
}

impl LineItemCandidate {
    pub fn new(
        item_name: impl Into<String>,
        industry: impl Into<String>,
        origin_country: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            industry: industry.into(),
            origin_country: origin_country.into(),
            quantity: quantity.into(),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Validates using `default_unit` when the candidate carries no unit text.
    pub fn validate_with_default(
        &self,
        default_unit: &QuantityUnit,
    ) -> Result<LineItemInput, ValidationError> {
        let item_name = required(&self.item_name, "item name")?;
        let industry = required(&self.industry, "industry")?;
        let origin_country = required(&self.origin_country, "origin country")?;
        let quantity = parse_quantity(&self.quantity)?;

        let unit = match self.unit.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => QuantityUnit::parse(raw),
            _ => default_unit.clone(),
        };

        Ok(LineItemInput {
            item_name,
            industry,
            origin_country,
            quantity,
            unit,
        })
    }

    pub fn validate(&self) -> Result<LineItemInput, ValidationError> {
        self.validate_with_default(&QuantityUnit::default())
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_quantity(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("quantity"));
    }

    let quantity = without_thousands_separators(trimmed)
        .and_then(|cleaned| cleaned.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidQuantity(trimmed.to_string()))?;

    if quantity < 0.0 {
        return Err(ValidationError::NegativeQuantity(trimmed.to_string()));
    }

    Ok(quantity)
}

/// Strips commas only when they group the integer digits in threes ("1,250.5").
fn without_thousands_separators(value: &str) -> Option<String> {
    if !value.contains(',') {
        return Some(value.to_string());
    }

    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (value, None),
    };
    if fraction.is_some_and(|fraction| fraction.contains(',')) {
        return None;
    }

    let is_digits = |group: &str| group.bytes().all(|byte| byte.is_ascii_digit());
    let mut groups = integer.split(',');
    let lead = groups
        .next()
        .map(|group| group.trim_start_matches(|ch| ch == '-' || ch == '+'))
        .unwrap_or_default();
    if lead.is_empty() || lead.len() > 3 || !is_digits(lead) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && is_digits(group)) {
        return None;
    }

    Some(value.replace(',', ""))
}
