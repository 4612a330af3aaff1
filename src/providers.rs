use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::recommend::HashtagAffinity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub region: String,
}

impl Locale {
    pub fn new(language: &str, region: &str) -> Self {
        Self {
            language: language.to_string(),
            region: region.to_string(),
        }
    }

    pub fn cache_tag(&self) -> String {
        format!(
            "{}-{}",
            self.language.to_lowercase(),
            self.region.to_lowercase()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub category: String,
    pub tone: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeedItem {
    pub title: String,
    pub raw_score: Option<f64>,
    pub url: Option<String>,
    pub growth_pct: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    News,
    Social,
    SearchQueries,
}

impl FeedKind {
    pub fn label(self) -> &'static str {
        match self {
            FeedKind::News => "news",
            FeedKind::Social => "social",
            FeedKind::SearchQueries => "search",
        }
    }
}

#[async_trait]
pub trait PostHistoryProvider: Send + Sync {
    async fn list_posts(&self, user_id: &str) -> Result<Vec<Post>>;
}

#[async_trait]
pub trait SearchHistoryProvider: Send + Sync {
    async fn recent_queries(&self, user_id: &str, limit: usize) -> Result<Vec<SearchQuery>>;
}

/// Errors must stay distinguishable from an empty-but-successful fetch:
/// an empty `Vec` is a valid result, not a failure.
#[async_trait]
pub trait ExternalFeed: Send + Sync {
    async fn fetch(&self, kind: FeedKind, locale: &Locale) -> Result<Vec<RawFeedItem>>;
}

#[async_trait]
pub trait AffinityBackend: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<HashMap<String, HashtagAffinity>>;
    async fn save(&self, user_id: &str, map: HashMap<String, HashtagAffinity>) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait LocaleProvider: Send + Sync {
    fn device_locale(&self) -> Locale;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
