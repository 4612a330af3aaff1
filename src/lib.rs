pub mod cache;
pub mod config;
pub mod error;
pub mod feeds;
pub mod presets;
pub mod providers;
pub mod recommend;
pub mod style;
pub mod trends;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::providers::{
    AffinityBackend, Clock, ExternalFeed, LocaleProvider, PostHistoryProvider,
    SearchHistoryProvider,
};
use crate::recommend::HashtagRecommender;
use crate::style::StyleAnalyzer;
use crate::trends::TrendAggregator;

pub use crate::error::{EngineError, Result};
pub use crate::providers::{Locale, Post, SearchQuery};
pub use crate::style::StyleReport;
pub use crate::trends::TrendCandidate;

/// Bumped whenever the scoring logic or cached payload shapes change; cache
/// entries written under another version are treated as misses.
pub const SCHEMA_VERSION: &str = "1.1";

pub struct Engine {
    pub trends: Arc<TrendAggregator>,
    pub recommender: HashtagRecommender,
    pub style: StyleAnalyzer,
}

impl Engine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EngineConfig,
        feed: Option<Arc<dyn ExternalFeed>>,
        post_history: Arc<dyn PostHistoryProvider>,
        search_history: Arc<dyn SearchHistoryProvider>,
        affinity: Arc<dyn AffinityBackend>,
        clock: Arc<dyn Clock>,
        locale: Arc<dyn LocaleProvider>,
        rng_seed: u64,
    ) -> Self {
        let trends = Arc::new(TrendAggregator::new(&config, feed));
        let recommender = HashtagRecommender::new(
            &config,
            trends.clone(),
            affinity,
            search_history,
            clock,
            locale,
            rng_seed,
        );
        let style = StyleAnalyzer::new(post_history);
        Self {
            trends,
            recommender,
            style,
        }
    }
}

pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(1.0)
}

pub(crate) fn normalize_text(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn normalize_tag(value: &str) -> String {
    value
        .trim()
        .trim_start_matches('#')
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

pub(crate) fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tag_strips_prefix_and_symbols() {
        assert_eq!(normalize_tag("#Coffee-Time"), "coffeetime");
        assert_eq!(normalize_tag("  Sunset Vibes "), "sunsetvibes");
        assert_eq!(normalize_tag("#"), "");
    }

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_hash64("spring"), stable_hash64("spring"));
        assert_ne!(stable_hash64("spring"), stable_hash64("summer"));
    }
}
