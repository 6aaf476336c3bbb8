use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One piece of supporting material behind a signal score, usually a news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Stable identity key.
    pub url: String,
}

impl Evidence {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            source_name: None,
            published_at: None,
            url: url.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// Title and description joined for keyword scanning.
    pub fn searchable_text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.title, description),
            None => self.title.clone(),
        }
    }
}

/// Whether the signal data behind a result was actually retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalAvailability {
    Fetched,
    Unavailable,
}

/// Evidence plus the 0-100 sub-score derived from it.
///
/// Every flagged index points into `evidence` and `score` never exceeds 100; the
/// constructors uphold both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalResult {
    evidence: Vec<Evidence>,
    flagged_indices: BTreeSet<usize>,
    score: u8,
    availability: SignalAvailability,
}

/// Points contributed by each flagged evidence item in a keyword scan.
pub const POINTS_PER_FLAGGED: u32 = 25;

impl SignalResult {
    /// Keyword-scan result: the score follows from the number of flagged items.
    pub fn from_flags(evidence: Vec<Evidence>, flagged: impl IntoIterator<Item = usize>) -> Self {
        let flagged_indices = valid_indices(&evidence, flagged);
        let score = (flagged_indices.len() as u32)
            .saturating_mul(POINTS_PER_FLAGGED)
            .min(100) as u8;
        Self {
            evidence,
            flagged_indices,
            score,
            availability: SignalAvailability::Fetched,
        }
    }

    /// Result carrying an externally chosen score (simulated bands).
    pub fn with_score(
        evidence: Vec<Evidence>,
        flagged: impl IntoIterator<Item = usize>,
        score: u8,
    ) -> Self {
        let flagged_indices = valid_indices(&evidence, flagged);
        Self {
            evidence,
            flagged_indices,
            score: score.min(100),
            availability: SignalAvailability::Fetched,
        }
    }

    /// Score-only result with no evidence (quantity sub-score).
    pub fn score_only(score: u8) -> Self {
        Self::with_score(Vec::new(), [], score)
    }

    /// Zero result standing in for a failed retrieval.
    pub fn unavailable() -> Self {
        Self {
            evidence: Vec::new(),
            flagged_indices: BTreeSet::new(),
            score: 0,
            availability: SignalAvailability::Unavailable,
        }
    }

    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    pub fn flagged_indices(&self) -> &BTreeSet<usize> {
        &self.flagged_indices
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_indices.len()
    }

    pub fn flagged_evidence(&self) -> impl Iterator<Item = &Evidence> {
        self.flagged_indices
            .iter()
            .filter_map(|index| self.evidence.get(*index))
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn availability(&self) -> SignalAvailability {
        self.availability
    }

    pub fn is_unavailable(&self) -> bool {
        self.availability == SignalAvailability::Unavailable
    }
}

fn valid_indices(evidence: &[Evidence], flagged: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
    flagged
        .into_iter()
        .filter(|index| *index < evidence.len())
        .collect()
}

/// Three-tier classification of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The four sub-scores fed to the aggregator, each expected in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskScores {
    pub country: u8,
    pub item: u8,
    #[serde(alias = "category")]
    pub industry: u8,
    pub quantity: u8,
}

impl RiskScores {
    pub fn out_of_range(&self) -> Option<(&'static str, u8)> {
        [
            ("country", self.country),
            ("item", self.item),
            ("industry", self.industry),
            ("quantity", self.quantity),
        ]
        .into_iter()
        .find(|(_, score)| *score > 100)
    }
}

/// Aggregator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRisk {
    pub final_score: u8,
    pub final_level: RiskLevel,
}

/// Per-signal results plus the aggregate they produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub country: SignalResult,
    pub item: SignalResult,
    pub industry: SignalResult,
    pub quantity: SignalResult,
    pub final_score: u8,
    pub final_level: RiskLevel,
}

impl RiskBreakdown {
    pub fn scores(&self) -> RiskScores {
        RiskScores {
            country: self.country.score(),
            item: self.item.score(),
            industry: self.industry.score(),
            quantity: self.quantity.score(),
        }
    }

    /// True when any of the news-backed signals could not be retrieved.
    pub fn has_unavailable_signals(&self) -> bool {
        self.country.is_unavailable() || self.item.is_unavailable() || self.industry.is_unavailable()
    }
}
