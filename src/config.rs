use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceWeights {
    pub news: f64,
    pub social: f64,
    pub search: f64,
    pub seasonal: f64,
    pub time_of_day: f64,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self {
            news: 1.0,
            social: 0.9,
            search: 0.8,
            seasonal: 0.7,
            time_of_day: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsConfig {
    pub max_results: usize,
    pub rank_decay: f64,
    pub source_timeout_ms: u64,
    pub news_enabled: bool,
    pub social_enabled: bool,
    pub search_enabled: bool,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            rank_decay: 0.05,
            source_timeout_ms: 6000,
            news_enabled: true,
            social_enabled: true,
            search_enabled: false,
        }
    }
}

impl TrendsConfig {
    pub fn any_feed_enabled(&self) -> bool {
        self.news_enabled || self.social_enabled || self.search_enabled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub trend_weight: f64,
    pub affinity_weight: f64,
    pub time_weight: f64,
    pub search_weight: f64,
    pub prompt_bonus: f64,
    pub search_query_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            trend_weight: 0.4,
            affinity_weight: 0.3,
            time_weight: 0.2,
            search_weight: 0.1,
            prompt_bonus: 0.15,
            search_query_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub trend_ttl_minutes: u64,
    pub live_ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            trend_ttl_minutes: 240,
            live_ttl_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    pub news_url: String,
    pub social_url: String,
    pub search_url: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            news_url: "http://localhost:8600/feeds/news".to_string(),
            social_url: "http://localhost:8600/feeds/social".to_string(),
            search_url: "http://localhost:8600/feeds/search".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: SourceWeights,
    pub trends: TrendsConfig,
    pub recommend: RecommendConfig,
    pub cache: CacheConfig,
    pub feeds: FeedsConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| EngineError::Config(format!("failed to read config: {}", err)))?;
                toml::from_str(&contents)
                    .map_err(|err| EngineError::Config(format!("failed to parse config: {}", err)))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("TREND_TTL_MINUTES") {
            if let Ok(minutes) = value.parse::<u64>() {
                self.cache.trend_ttl_minutes = minutes;
            }
        }
        if let Ok(value) = env::var("LIVE_TTL_MINUTES") {
            if let Ok(minutes) = value.parse::<u64>() {
                self.cache.live_ttl_minutes = minutes;
            }
        }
        if let Ok(value) = env::var("TREND_MAX_RESULTS") {
            if let Ok(max) = value.parse::<usize>() {
                self.trends.max_results = max;
            }
        }
        if let Ok(value) = env::var("FEED_TIMEOUT_MS") {
            if let Ok(timeout) = value.parse::<u64>() {
                self.trends.source_timeout_ms = timeout;
            }
        }
        if let Ok(value) = env::var("NEWS_FEED_URL") {
            if !value.trim().is_empty() {
                self.feeds.news_url = value;
            }
        }
        if let Ok(value) = env::var("SOCIAL_FEED_URL") {
            if !value.trim().is_empty() {
                self.feeds.social_url = value;
            }
        }
        if let Ok(value) = env::var("SEARCH_FEED_URL") {
            if !value.trim().is_empty() {
                self.feeds.search_url = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("TRENDMUSE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/trendmuse.toml")))
}
