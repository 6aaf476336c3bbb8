use std::ops::RangeInclusive;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{SignalError, SignalSource};
use crate::workflows::risk::{Evidence, SignalResult};

/// Country names treated as high tariff exposure by the simulator.
pub const HIGH_RISK_COUNTRIES: &[&str] = &[
    "china",
    "russia",
    "iran",
    "north korea",
    "venezuela",
    "belarus",
    "syria",
    "cuba",
    "myanmar",
];

const HIGH_RISK_COUNTRY_SCORES: RangeInclusive<u8> = 75..=100;
const LOW_BAND_SCORES: RangeInclusive<u8> = 0..=19;
const MEDIUM_BAND_SCORES: RangeInclusive<u8> = 30..=59;
const HIGH_BAND_SCORES: RangeInclusive<u8> = 70..=99;
const LOW_BAND_PROBABILITY: f64 = 0.6;
const MEDIUM_BAND_PROBABILITY: f64 = 0.3;

const SIMULATED_SOURCE_NAME: &str = "Simulated Trade Wire";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Demo source producing randomized but plausible results without a network.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    seed: Option<u64>,
}

impl SimulatedSource {
    /// With a seed, output is repeatable for a given query; without one every call
    /// draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    fn rng_for(&self, query: &str) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(query_seed(seed, query)),
            None => StdRng::from_entropy(),
        }
    }

    /// Pure simulation step, separated from the async trait for direct testing.
    pub fn simulate(&self, query: &str) -> SignalResult {
        let mut rng = self.rng_for(query);
        let subject = query.trim();

        if let Some(country) = matched_high_risk_country(query) {
            let score = rng.gen_range(HIGH_RISK_COUNTRY_SCORES);
            let evidence = high_risk_country_evidence(country);
            let flagged = 0..evidence.len();
            return SignalResult::with_score(evidence, flagged, score);
        }

        let band: f64 = rng.gen();
        if band < LOW_BAND_PROBABILITY {
            let score = rng.gen_range(LOW_BAND_SCORES);
            let count = rng.gen_range(0..=2usize);
            let evidence = low_risk_evidence(subject).into_iter().take(count).collect();
            SignalResult::with_score(evidence, [], score)
        } else if band < LOW_BAND_PROBABILITY + MEDIUM_BAND_PROBABILITY {
            let score = rng.gen_range(MEDIUM_BAND_SCORES);
            let evidence = vec![
                simulated_evidence(
                    subject,
                    "medium-1",
                    format!("Trade officials weigh new duty review covering {subject}"),
                    "Regulators signalled a possible levy adjustment later this year.",
                ),
                simulated_evidence(
                    subject,
                    "medium-2",
                    format!("Importers report steady demand for {subject}"),
                    "Shipping volumes remained in line with seasonal norms.",
                ),
            ];
            SignalResult::with_score(evidence, [0], score)
        } else {
            let score = rng.gen_range(HIGH_BAND_SCORES);
            let evidence = vec![
                simulated_evidence(
                    subject,
                    "high-1",
                    format!("Sharp tariff increase proposed for {subject}"),
                    "Lawmakers are pushing a higher import tax within weeks.",
                ),
                simulated_evidence(
                    subject,
                    "high-2",
                    format!("Retaliation threatened over {subject} trade dispute"),
                    "Partners warn of countermeasures and quota limits.",
                ),
            ];
            SignalResult::with_score(evidence, [0, 1], score)
        }
    }
}

#[async_trait]
impl SignalSource for SimulatedSource {
    fn source_tag(&self) -> &'static str {
        "simulated"
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError> {
        Ok(self.simulate(query))
    }
}

/// FNV-1a over the seed bytes and the lowercased query; stable across builds.
fn query_seed(seed: u64, query: &str) -> u64 {
    seed.to_le_bytes()
        .into_iter()
        .chain(query.to_lowercase().bytes())
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

fn matched_high_risk_country(query: &str) -> Option<&'static str> {
    let lowered = query.to_lowercase();
    HIGH_RISK_COUNTRIES
        .iter()
        .copied()
        .find(|country| lowered.contains(country))
}

fn high_risk_country_evidence(country: &str) -> Vec<Evidence> {
    let display = title_case(country);
    vec![
        simulated_evidence(
            country,
            "country-1",
            format!("New tariffs announced on imports from {display}"),
            "Officials confirmed an expanded duty schedule effective next quarter.",
        ),
        simulated_evidence(
            country,
            "country-2",
            format!("Sanctions on {display} tighten supply chains"),
            "Several exporters face restrictions on key shipments.",
        ),
        simulated_evidence(
            country,
            "country-3",
            format!("Trade war fears grow as {display} retaliates"),
            "Analysts expect anti-dumping investigations to follow.",
        ),
    ]
}

fn low_risk_evidence(subject: &str) -> Vec<Evidence> {
    vec![
        simulated_evidence(
            subject,
            "low-1",
            format!("Stable outlook for {subject}"),
            "Market conditions remain calm with no policy changes expected.",
        ),
        simulated_evidence(
            subject,
            "low-2",
            format!("Suppliers expand capacity for {subject}"),
            "Producers added shifts to keep up with orders.",
        ),
    ]
}

fn simulated_evidence(subject: &str, slot: &str, title: String, description: &str) -> Evidence {
    Evidence::new(title, format!("https://simulated.news/{}/{slot}", slug(subject)))
        .with_description(description)
        .with_source(SIMULATED_SOURCE_NAME)
}

fn slug(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
