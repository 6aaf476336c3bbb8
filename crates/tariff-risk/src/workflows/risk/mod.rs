//! Scoring core: quantity bands, weighted aggregation, and the recovered signal lookup.
//!
//! [`signal_risk`], [`quantity_risk`] and [`final_risk`] form the exported scoring API
//! consumed by the HTTP service, the CLI and the advisory text generators.

mod aggregate;
pub mod domain;
mod quantity;

pub use aggregate::{
    final_risk, COUNTRY_WEIGHT, HIGH_THRESHOLD, INDUSTRY_WEIGHT, ITEM_WEIGHT, MEDIUM_THRESHOLD,
    QUANTITY_WEIGHT,
};
pub use domain::{
    Evidence, FinalRisk, RiskBreakdown, RiskLevel, RiskScores, SignalAvailability, SignalResult,
};
pub use quantity::{quantity_risk, QuantityUnit};

use crate::workflows::signals::SignalSource;
use tracing::warn;

/// Resolves one query, substituting an unavailable zero result when retrieval fails.
pub async fn signal_risk<S>(source: &S, query: &str) -> SignalResult
where
    S: SignalSource + ?Sized,
{
    match source.resolve(query).await {
        Ok(result) => result,
        Err(err) => {
            warn!(source = source.source_tag(), %query, error = %err, "signal retrieval failed");
            SignalResult::unavailable()
        }
    }
}
