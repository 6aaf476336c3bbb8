//! Plain-language guidance derived from a scored inventory item.

use serde::Serialize;

use crate::workflows::inventory::InventoryItem;
use crate::workflows::risk::{RiskLevel, SignalResult};

/// Sourcing candidates, in preference order.
pub const ALTERNATIVE_COUNTRIES: &[&str] = &[
    "Vietnam",
    "Mexico",
    "India",
    "Poland",
    "Turkey",
    "Malaysia",
    "Thailand",
    "Indonesia",
    "South Korea",
    "Canada",
    "Brazil",
    "Germany",
    "Netherlands",
];

const ALTERNATIVE_COUNT: usize = 3;

/// Advice, alternative origins, and one news summary per signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryReport {
    pub item_id: String,
    pub level: RiskLevel,
    pub advice: String,
    pub alternatives: Vec<String>,
    pub alternatives_note: String,
    pub signal_summaries: SignalSummaries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalSummaries {
    pub country: String,
    pub item: String,
    pub industry: String,
}

impl AdvisoryReport {
    pub fn for_item(item: &InventoryItem) -> Self {
        let alternatives = alternative_countries(&item.origin_country);
        let alternatives_note = format!(
            "Consider moving part of the {} ({}) sourcing for {} to {}. Shifting over the next 3-6 months could cut costs by 10-15% and lower exposure; watch policy updates for timing.",
            item.item_name,
            quantity_label(item),
            item.industry,
            alternatives.join(", "),
        );

        Self {
            item_id: item.id.to_string(),
            level: item.level(),
            advice: advice(item),
            alternatives,
            alternatives_note,
            signal_summaries: SignalSummaries {
                country: signal_summary("country", &item.origin_country, &item.risk_breakdown.country),
                item: signal_summary("item", &item.item_name, &item.risk_breakdown.item),
                industry: signal_summary("industry", &item.industry, &item.risk_breakdown.industry),
            },
        }
    }
}

fn quantity_label(item: &InventoryItem) -> String {
    format!("{} {}", item.quantity, item.unit)
}

/// Level-specific recommendation for one item.
pub fn advice(item: &InventoryItem) -> String {
    let quantity = quantity_label(item);
    match item.level() {
        RiskLevel::High => format!(
            "{} imports in {} from {} ({quantity}) carry high tariff risk. Consider diversifying suppliers, renegotiating contracts, or moving sourcing to lower-risk countries; acting now could save up to 20% on costs.",
            item.item_name, item.industry, item.origin_country,
        ),
        RiskLevel::Medium => format!(
            "{} in {} from {} ({quantity}) carries moderate tariff risk. Monitor the news and consider partial hedging or flexible contracts; potential savings are 5-10%.",
            item.item_name, item.industry, item.origin_country,
        ),
        RiskLevel::Low => format!(
            "{} in {} from {} ({quantity}) carries low tariff risk. Maintain the current strategy and stay alert for policy changes.",
            item.item_name, item.industry, item.origin_country,
        ),
    }
}

/// The first candidates that differ from the origin country.
pub fn alternative_countries(origin_country: &str) -> Vec<String> {
    let origin = origin_country.trim();
    ALTERNATIVE_COUNTRIES
        .iter()
        .filter(|country| !country.eq_ignore_ascii_case(origin))
        .take(ALTERNATIVE_COUNT)
        .map(|country| country.to_string())
        .collect()
}

/// One-line read of a signal's evidence, driven by its flagged count.
pub fn signal_summary(kind: &str, name: &str, signal: &SignalResult) -> String {
    if signal.is_unavailable() {
        return format!("Signal data unavailable for this {kind}; the score treats it as zero.");
    }
    if name.trim().is_empty() || signal.evidence().is_empty() {
        return format!("No recent news for this {kind}.");
    }

    match signal.flagged_count() {
        flagged if flagged > 2 => format!(
            "Recent news for {name} is mostly negative, with several high-risk developments. Review your exposure."
        ),
        flagged if flagged > 0 => format!(
            "Some recent news for {name} points to moderate risk. Keep monitoring developments."
        ),
        _ => format!("News for {name} is broadly neutral. No immediate action required."),
    }
}
