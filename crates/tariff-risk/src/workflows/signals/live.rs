use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::keywords;
use super::{SignalError, SignalSource};
use crate::config::SignalConfig;
use crate::workflows::risk::{Evidence, SignalResult};

pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";

/// Keyword-scan source backed by a NewsAPI-compatible `/everything` endpoint.
pub struct NewsApiSource {
    base_url: String,
    api_key: String,
    page_size: u32,
    http: reqwest::Client,
}

impl NewsApiSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        page_size: u32,
    ) -> Result<Self, SignalError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SignalError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_size: page_size.max(1),
            http,
        })
    }

    pub fn from_config(config: &SignalConfig) -> Result<Self, SignalError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SignalError::MissingApiKey)?;

        Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_millis(config.timeout_ms),
            config.page_size,
        )
    }

    fn url(&self) -> String {
        format!("{}/everything", self.base_url)
    }
}

impl std::fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SignalSource for NewsApiSource {
    fn source_tag(&self) -> &'static str {
        "news_api"
    }

    async fn resolve(&self, query: &str) -> Result<SignalResult, SignalError> {
        let page_size = self.page_size.to_string();
        let response = self
            .http
            .get(self.url())
            .header("X-Api-Key", self.api_key.as_str())
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|err| SignalError::Transport(err.to_string()))?;

        let http_status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| SignalError::Transport(err.to_string()))?;
        let payload: NewsPayload = serde_json::from_slice(&body).map_err(|err| {
            SignalError::Malformed(format!("HTTP {http_status}: {err}"))
        })?;

        if !payload.status.eq_ignore_ascii_case("ok") {
            return Err(SignalError::Status {
                status: payload.status,
                message: payload
                    .message
                    .unwrap_or_else(|| format!("HTTP {http_status}")),
            });
        }

        let evidence = collect_evidence(payload.articles);
        debug!(%query, articles = evidence.len(), "news articles retrieved");
        Ok(keywords::scan(evidence))
    }
}

#[derive(Debug, Deserialize)]
struct NewsPayload {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<NewsArticleSource>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsArticleSource {
    #[serde(default)]
    name: Option<String>,
}

fn collect_evidence(articles: Vec<NewsArticle>) -> Vec<Evidence> {
    let mut seen = HashSet::new();
    let mut evidence = Vec::with_capacity(articles.len());

    for article in articles {
        let (Some(title), Some(url)) = (non_blank(article.title), non_blank(article.url)) else {
            continue;
        };
        if !seen.insert(url.clone()) {
            continue;
        }

        evidence.push(Evidence {
            title,
            description: non_blank(article.description),
            source_name: article.source.and_then(|source| non_blank(source.name)),
            published_at: article.published_at.as_deref().and_then(parse_timestamp),
            url,
        });
    }

    evidence
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
