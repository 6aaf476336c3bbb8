use serde::{Deserialize, Deserializer, Serialize};

use crate::workflows::risk::{QuantityUnit, RiskBreakdown, RiskLevel};

/// Identifier wrapper for assembled inventory items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItemId(pub String);

impl std::fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw line item exactly as typed into the entry form or read from a file row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemCandidate {
    #[serde(default)]
    pub item_name: String,
    #[serde(default, alias = "category")]
    pub industry: String,
    #[serde(default)]
    pub origin_country: String,
    /// Quantity text; JSON numbers are accepted and kept in their textual form.
    #[serde(default, deserialize_with = "quantity_text")]
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
}

fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(value) => value.to_string(),
        Raw::Text(value) => value,
        Raw::Missing(()) => String::new(),
    })
}

/// Validated line item attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub item_name: String,
    #[serde(alias = "category")]
    pub industry: String,
    pub origin_country: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: QuantityUnit,
}

/// Immutable scored record held in the inventory ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub item_name: String,
    pub industry: String,
    pub origin_country: String,
    pub quantity: f64,
    pub unit: QuantityUnit,
    pub risk_breakdown: RiskBreakdown,
}

impl InventoryItem {
    pub fn level(&self) -> RiskLevel {
        self.risk_breakdown.final_level
    }

    pub fn final_score(&self) -> u8 {
        self.risk_breakdown.final_score
    }
}

/// Level counts across the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub average_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_risk: Option<InventoryItemId>,
    pub items_with_unavailable_signals: usize,
}

impl InventorySummary {
    pub fn from_items(items: &[InventoryItem]) -> Self {
        let count_level =
            |level: RiskLevel| items.iter().filter(|item| item.level() == level).count();
        let total_score: u32 = items.iter().map(|item| u32::from(item.final_score())).sum();
        let average_score = if items.is_empty() {
            0.0
        } else {
            f64::from(total_score) / items.len() as f64
        };

        // First item wins ties so the summary is stable across calls.
        let highest_risk = items
            .iter()
            .fold(None::<&InventoryItem>, |best, item| match best {
                Some(current) if current.final_score() >= item.final_score() => Some(current),
                _ => Some(item),
            })
            .map(|item| item.id.clone());

        Self {
            total: items.len(),
            low: count_level(RiskLevel::Low),
            medium: count_level(RiskLevel::Medium),
            high: count_level(RiskLevel::High),
            average_score,
            highest_risk,
            items_with_unavailable_signals: items
                .iter()
                .filter(|item| item.risk_breakdown.has_unavailable_signals())
                .count(),
        }
    }
}
