use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::inventory::RetrievalPolicy;
use crate::workflows::signals::DEFAULT_NEWS_API_BASE_URL;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub signals: SignalConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            signals: SignalConfig::from_env()?,
            scoring: ScoringConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which signal source backs the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMode {
    Live,
    Simulated,
    /// Live when an API key is configured, simulated otherwise.
    Auto,
}

/// Injected settings for the signal sources. Keys are never compiled in.
#[derive(Clone, PartialEq, Eq)]
pub struct SignalConfig {
    pub mode: SignalMode,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    pub page_size: u32,
    pub simulator_seed: Option<u64>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            mode: SignalMode::Auto,
            api_key: None,
            base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
            timeout_ms: 5000,
            page_size: 20,
            simulator_seed: None,
        }
    }
}

impl fmt::Debug for SignalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalConfig")
            .field("mode", &self.mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("page_size", &self.page_size)
            .field("simulator_seed", &self.simulator_seed)
            .finish()
    }
}

impl SignalConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mode = match env::var("TARIFF_SIGNAL_SOURCE") {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "live" | "news" => SignalMode::Live,
                "simulated" | "simulator" | "demo" => SignalMode::Simulated,
                "" | "auto" => SignalMode::Auto,
                _ => return Err(ConfigError::InvalidSignalSource(value)),
            },
            Err(_) => defaults.mode,
        };

        let api_key = env::var("NEWS_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let base_url = env::var("NEWS_API_BASE_URL").unwrap_or(defaults.base_url);
        let timeout_ms = parse_var("NEWS_API_TIMEOUT_MS", defaults.timeout_ms)?;
        let page_size = parse_var("NEWS_API_PAGE_SIZE", defaults.page_size)?;
        let simulator_seed = match env::var("TARIFF_SIMULATOR_SEED") {
            Ok(value) => Some(value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                variable: "TARIFF_SIMULATOR_SEED",
                value,
            })?),
            Err(_) => None,
        };

        Ok(Self {
            mode,
            api_key,
            base_url,
            timeout_ms,
            page_size,
            simulator_seed,
        })
    }
}

/// Orchestration settings for the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub retrieval_policy: RetrievalPolicy,
    pub import_concurrency: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            retrieval_policy: RetrievalPolicy::Substitute,
            import_concurrency: 4,
        }
    }
}

impl ScoringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let retrieval_policy = match env::var("TARIFF_RETRIEVAL_POLICY") {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "" | "substitute" => RetrievalPolicy::Substitute,
                "abort" => RetrievalPolicy::Abort,
                _ => return Err(ConfigError::InvalidRetrievalPolicy(value)),
            },
            Err(_) => defaults.retrieval_policy,
        };

        let import_concurrency = parse_var("TARIFF_IMPORT_CONCURRENCY", defaults.import_concurrency)?;
        if import_concurrency == 0 {
            return Err(ConfigError::InvalidNumber {
                variable: "TARIFF_IMPORT_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            retrieval_policy,
            import_concurrency,
        })
    }
}

fn parse_var<T: std::str::FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable, value }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
    InvalidSignalSource(String),
    InvalidRetrievalPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a positive integer (got '{value}')")
            }
            ConfigError::InvalidSignalSource(value) => write!(
                f,
                "TARIFF_SIGNAL_SOURCE must be live, simulated, or auto (got '{value}')"
            ),
            ConfigError::InvalidRetrievalPolicy(value) => write!(
                f,
                "TARIFF_RETRIEVAL_POLICY must be substitute or abort (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "TARIFF_SIGNAL_SOURCE",
            "NEWS_API_KEY",
            "NEWS_API_BASE_URL",
            "NEWS_API_TIMEOUT_MS",
            "NEWS_API_PAGE_SIZE",
            "TARIFF_SIMULATOR_SEED",
            "TARIFF_RETRIEVAL_POLICY",
            "TARIFF_IMPORT_CONCURRENCY",
        ] {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.signals, SignalConfig::default());
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_signal_and_scoring_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TARIFF_SIGNAL_SOURCE", "Live");
        env::set_var("NEWS_API_KEY", "secret");
        env::set_var("NEWS_API_BASE_URL", "http://127.0.0.1:9999/v2");
        env::set_var("NEWS_API_TIMEOUT_MS", "1500");
        env::set_var("TARIFF_SIMULATOR_SEED", "99");
        env::set_var("TARIFF_RETRIEVAL_POLICY", "abort");
        env::set_var("TARIFF_IMPORT_CONCURRENCY", "8");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.signals.mode, SignalMode::Live);
        assert_eq!(config.signals.api_key.as_deref(), Some("secret"));
        assert_eq!(config.signals.base_url, "http://127.0.0.1:9999/v2");
        assert_eq!(config.signals.timeout_ms, 1500);
        assert_eq!(config.signals.simulator_seed, Some(99));
        assert_eq!(config.scoring.retrieval_policy, RetrievalPolicy::Abort);
        assert_eq!(config.scoring.import_concurrency, 8);
        reset_env();
    }

    #[test]
    fn rejects_invalid_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TARIFF_SIGNAL_SOURCE", "carrier-pigeon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSignalSource(_))
        ));

        reset_env();
        env::set_var("NEWS_API_TIMEOUT_MS", "soon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                variable: "NEWS_API_TIMEOUT_MS",
                ..
            })
        ));

        reset_env();
        env::set_var("TARIFF_IMPORT_CONCURRENCY", "0");
        assert!(AppConfig::load().is_err());
        reset_env();
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = SignalConfig {
            api_key: Some("super-secret".to_string()),
            ..SignalConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
