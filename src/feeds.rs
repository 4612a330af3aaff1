use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::providers::{ExternalFeed, FeedKind, Locale, RawFeedItem};

/// Default request/response `ExternalFeed` implementation over HTTP. Each
/// feed kind maps to one configured endpoint returning `{"items": [...]}`.
#[derive(Clone)]
pub struct HttpFeedClient {
    client: reqwest::Client,
    news_url: String,
    social_url: String,
    search_url: String,
}

#[derive(Deserialize)]
struct FeedResponse {
    items: Vec<RawFeedItem>,
}

impl HttpFeedClient {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.trends.source_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EngineError::Config(format!("failed to build feed client: {}", err)))?;
        Ok(Self {
            client,
            news_url: config.feeds.news_url.clone(),
            social_url: config.feeds.social_url.clone(),
            search_url: config.feeds.search_url.clone(),
        })
    }

    fn endpoint(&self, kind: FeedKind) -> &str {
        match kind {
            FeedKind::News => &self.news_url,
            FeedKind::Social => &self.social_url,
            FeedKind::SearchQueries => &self.search_url,
        }
    }
}

#[async_trait]
impl ExternalFeed for HttpFeedClient {
    async fn fetch(&self, kind: FeedKind, locale: &Locale) -> Result<Vec<RawFeedItem>> {
        let url = self.endpoint(kind).trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(EngineError::SourceUnavailable(format!(
                "{} feed has no endpoint configured",
                kind.label()
            )));
        }

        let response = self
            .client
            .get(url)
            .query(&[
                ("lang", locale.language.as_str()),
                ("region", locale.region.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                EngineError::SourceUnavailable(format!(
                    "{} feed request failed: {}",
                    kind.label(),
                    err
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::SourceUnavailable(format!(
                "{} feed error: {}",
                kind.label(),
                status
            )));
        }

        let body: FeedResponse = response.json().await.map_err(|err| {
            EngineError::SourceUnavailable(format!(
                "{} feed response parse failed: {}",
                kind.label(),
                err
            ))
        })?;

        Ok(body.items)
    }
}
