use super::domain::{FinalRisk, RiskLevel, RiskScores};

// Weights are expressed in tenths and sum to 10 so the weighted sum stays exact.
pub const ITEM_WEIGHT: u32 = 4;
pub const COUNTRY_WEIGHT: u32 = 3;
pub const INDUSTRY_WEIGHT: u32 = 2;
pub const QUANTITY_WEIGHT: u32 = 1;
const WEIGHT_SCALE: u32 = ITEM_WEIGHT + COUNTRY_WEIGHT + INDUSTRY_WEIGHT + QUANTITY_WEIGHT;

/// Lowest final score classified as [`RiskLevel::High`].
pub const HIGH_THRESHOLD: u8 = 70;
/// Lowest final score classified as [`RiskLevel::Medium`].
pub const MEDIUM_THRESHOLD: u8 = 30;

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Combines the four sub-scores into the final score and level.
///
/// `round(item*0.4 + country*0.3 + industry*0.2 + quantity*0.1)`, rounding exact
/// halves away from zero.
pub fn final_risk(scores: RiskScores) -> FinalRisk {
    debug_assert!(
        scores.out_of_range().is_none(),
        "sub-scores must be within 0..=100: {scores:?}"
    );

    let weighted_tenths = u32::from(scores.item) * ITEM_WEIGHT
        + u32::from(scores.country) * COUNTRY_WEIGHT
        + u32::from(scores.industry) * INDUSTRY_WEIGHT
        + u32::from(scores.quantity) * QUANTITY_WEIGHT;
    let final_score = ((weighted_tenths + WEIGHT_SCALE / 2) / WEIGHT_SCALE).min(100) as u8;

    FinalRisk {
        final_score,
        final_level: RiskLevel::from_score(final_score),
    }
}
