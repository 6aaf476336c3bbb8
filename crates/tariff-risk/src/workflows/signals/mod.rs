//! Signal sources turning a free-text query into evidence and a 0-100 sub-score.

pub mod keywords;
mod live;
mod simulated;

pub use live::{NewsApiSource, DEFAULT_NEWS_API_BASE_URL};
pub use simulated::{SimulatedSource, HIGH_RISK_COUNTRIES};

use crate::config::{SignalConfig, SignalMode};
use crate::workflows::risk::SignalResult;
use async_trait::async_trait;

/// Capability shared by the live and simulated sources.
///
/// Scoring code depends only on this contract and never on which variant produced a
/// result.
#[async_trait]
pub trait SignalSource: Send + Sync {
    fn source_tag(&self) -> &'static str;

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError>;
}

/// Retrieval failure from a signal source.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("signal source unreachable: {0}")]
    Transport(String),
    #[error("signal source reported status '{status}': {message}")]
    Status { status: String, message: String },
    #[error("malformed signal payload: {0}")]
    Malformed(String),
    #[error("live signal source requires NEWS_API_KEY")]
    MissingApiKey,
}

/// The three query contexts resolved for every line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalQueries {
    pub country: String,
    pub item: String,
    pub industry: String,
}

impl SignalQueries {
    pub fn for_attributes(item_name: &str, industry: &str, origin_country: &str) -> Self {
        Self {
            country: format!("US {origin_country} tariffs"),
            item: format!("US {origin_country} {item_name} tariff OR US {item_name} tariff"),
            industry: format!("US {industry} tariffs"),
        }
    }
}

/// Source selected from configuration at startup.
#[derive(Debug)]
pub enum ConfiguredSource {
    Live(NewsApiSource),
    Simulated(SimulatedSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &SignalConfig) -> Result<Self, SignalError> {
        let live = match config.mode {
            SignalMode::Live => true,
            SignalMode::Simulated => false,
            SignalMode::Auto => config.api_key.is_some(),
        };

        if live {
            NewsApiSource::from_config(config).map(Self::Live)
        } else {
            Ok(Self::Simulated(SimulatedSource::new(config.simulator_seed)))
        }
    }
}

#[async_trait]
impl SignalSource for ConfiguredSource {
    fn source_tag(&self) -> &'static str {
        match self {
            ConfiguredSource::Live(source) => source.source_tag(),
            ConfiguredSource::Simulated(source) => source.source_tag(),
        }
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError> {
        match self {
            ConfiguredSource::Live(source) => source.resolve(query).await,
            ConfiguredSource::Simulated(source) => source.resolve(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_follow_tariff_templates() {
        let queries = SignalQueries::for_attributes("Steel", "Manufacturing", "China");
        assert_eq!(queries.country, "US China tariffs");
        assert_eq!(queries.item, "US China Steel tariff OR US Steel tariff");
        assert_eq!(queries.industry, "US Manufacturing tariffs");
    }

    #[test]
    fn auto_mode_without_key_uses_simulator() {
        let config = SignalConfig::default();
        let source = ConfiguredSource::from_config(&config).expect("source builds");
        assert_eq!(source.source_tag(), "simulated");
    }

    #[test]
    fn auto_mode_with_key_uses_live_source() {
        let config = SignalConfig {
            api_key: Some("test-key".to_string()),
            ..SignalConfig::default()
        };
        let source = ConfiguredSource::from_config(&config).expect("source builds");
        assert_eq!(source.source_tag(), "news_api");
    }

    #[test]
    fn live_mode_requires_key() {
        let config = SignalConfig {
            mode: SignalMode::Live,
            ..SignalConfig::default()
        };
        let error = ConfiguredSource::from_config(&config).expect_err("key required");
        assert!(matches!(error, SignalError::MissingApiKey));
    }
}
