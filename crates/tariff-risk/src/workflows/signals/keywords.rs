use crate::workflows::risk::{Evidence, SignalResult};

/// Terms whose presence marks an evidence item as risk-contributing.
pub const RISK_TERMS: &[&str] = &[
    "tariff",
    "trade war",
    "sanction",
    "ban",
    "restriction",
    "high duty",
    "import tax",
    "retaliation",
    "penalty",
    "levy",
    "embargo",
    "quota",
    "anti-dumping",
    "duty",
];

pub fn is_risk_flagged(evidence: &Evidence) -> bool {
    let text = evidence.searchable_text().to_lowercase();
    RISK_TERMS.iter().any(|term| text.contains(term))
}

/// Flags every evidence item mentioning a risk term and scores the result.
pub fn scan(evidence: Vec<Evidence>) -> SignalResult {
    let flagged: Vec<usize> = evidence
        .iter()
        .enumerate()
        .filter(|(_, item)| is_risk_flagged(item))
        .map(|(index, _)| index)
        .collect();
    SignalResult::from_flags(evidence, flagged)
}
