use std::sync::atomic::{AtomicU64, Ordering};

use super::domain::{InventoryItem, InventoryItemId, LineItemInput};
use crate::workflows::risk::{final_risk, RiskBreakdown, RiskScores, SignalResult};

static ITEM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_item_id() -> InventoryItemId {
    let id = ITEM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InventoryItemId(format!("item-{id:06}"))
}

/// Aggregates the four sub-scores into a breakdown.
pub fn build_breakdown(
    country: SignalResult,
    item: SignalResult,
    industry: SignalResult,
    quantity: SignalResult,
) -> RiskBreakdown {
    let final_risk = final_risk(RiskScores {
        country: country.score(),
        item: item.score(),
        industry: industry.score(),
        quantity: quantity.score(),
    });

    RiskBreakdown {
        country,
        item,
        industry,
        quantity,
        final_score: final_risk.final_score,
        final_level: final_risk.final_level,
    }
}

/// Creates the immutable record for one validated line item under a fresh id.
pub fn assemble(
    input: &LineItemInput,
    country: SignalResult,
    item: SignalResult,
    industry: SignalResult,
    quantity: SignalResult,
) -> InventoryItem {
    assemble_breakdown(input, build_breakdown(country, item, industry, quantity))
}

pub(crate) fn assemble_breakdown(input: &LineItemInput, breakdown: RiskBreakdown) -> InventoryItem {
    InventoryItem {
        id: next_item_id(),
        item_name: input.item_name.clone(),
        industry: input.industry.clone(),
        origin_country: input.origin_country.clone(),
        quantity: input.quantity,
        unit: input.unit.clone(),
        risk_breakdown: breakdown,
    }
}
