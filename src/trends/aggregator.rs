use chrono::{DateTime, Datelike, Timelike, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::cache::ScoreCache;
use crate::config::{EngineConfig, SourceWeights, TrendsConfig};
use crate::error::Result;
use crate::presets::{PresetCatalog, TimeSlot};
use crate::providers::{ExternalFeed, FeedKind, Locale, RawFeedItem};
use crate::trends::{TrendCandidate, TrendCategory};
use crate::{normalize_tag, normalize_text, stable_hash64, SCHEMA_VERSION};

pub struct TrendAggregator {
    weights: SourceWeights,
    config: TrendsConfig,
    cache_ttl: Duration,
    feed: Option<Arc<dyn ExternalFeed>>,
    cache: ScoreCache<Vec<TrendCandidate>>,
}

impl TrendAggregator {
    pub fn new(config: &EngineConfig, feed: Option<Arc<dyn ExternalFeed>>) -> Self {
        let live = feed.is_some() && config.trends.any_feed_enabled();
        let ttl_minutes = if live {
            config.cache.live_ttl_minutes
        } else {
            config.cache.trend_ttl_minutes
        };
        Self {
            weights: config.weights.clone(),
            config: config.trends.clone(),
            cache_ttl: Duration::from_secs(ttl_minutes * 60),
            feed,
            cache: ScoreCache::new(SCHEMA_VERSION),
        }
    }

    /// Ranked, deduplicated trend candidates for the given locale and
    /// instant. Never fails: with every external source down the preset
    /// subset is returned instead.
    pub async fn get_trends(&self, locale: &Locale, now: DateTime<Utc>) -> Vec<TrendCandidate> {
        let slot = TimeSlot::from_hour(now.hour());
        let key = format!("trends:{}:{}", locale.cache_tag(), slot.label());
        let result = self
            .cache
            .get_or_fill(&key, self.cache_ttl, || self.aggregate(locale, now, slot))
            .await;

        match result {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("trend aggregation failed, serving presets: {}", err);
                self.preset_only(now, slot)
            }
        }
    }

    pub async fn invalidate_all(&self) {
        self.cache.invalidate_prefix("trends:").await;
    }

    pub async fn cache_age_minutes(&self, locale: &Locale, now: DateTime<Utc>) -> Option<i64> {
        let slot = TimeSlot::from_hour(now.hour());
        let key = format!("trends:{}:{}", locale.cache_tag(), slot.label());
        self.cache.age_minutes(&key).await
    }

    async fn aggregate(
        &self,
        locale: &Locale,
        now: DateTime<Utc>,
        slot: TimeSlot,
    ) -> Result<Vec<TrendCandidate>> {
        let mut table = MergeTable::new(now.timestamp());

        // Local presets are merged first so that ties resolve in their
        // favor over network-derived candidates.
        self.absorb_presets(&mut table, now, slot);

        let timeout = Duration::from_millis(self.config.source_timeout_ms);
        let (news, social, search) = tokio::join!(
            self.fetch_source(FeedKind::News, self.config.news_enabled, locale, timeout),
            self.fetch_source(FeedKind::Social, self.config.social_enabled, locale, timeout),
            self.fetch_source(
                FeedKind::SearchQueries,
                self.config.search_enabled,
                locale,
                timeout
            ),
        );

        self.absorb_feed(&mut table, TrendCategory::News, self.weights.news, &news);
        self.absorb_feed(&mut table, TrendCategory::Social, self.weights.social, &social);
        self.absorb_feed(&mut table, TrendCategory::Search, self.weights.search, &search);

        Ok(table.finish(self.config.max_results))
    }

    fn preset_only(&self, now: DateTime<Utc>, slot: TimeSlot) -> Vec<TrendCandidate> {
        let mut table = MergeTable::new(now.timestamp());
        self.absorb_presets(&mut table, now, slot);
        table.finish(self.config.max_results)
    }

    fn absorb_presets(&self, table: &mut MergeTable, now: DateTime<Utc>, slot: TimeSlot) {
        let seasonal = PresetCatalog::seasonal_set(now.date_naive());
        for (rank, keyword) in seasonal.keywords.iter().enumerate() {
            let mut hashtags = vec![normalize_tag(keyword)];
            if let Some(tag) = seasonal.hashtags.get(rank) {
                hashtags.push((*tag).to_string());
            }
            table.absorb(
                keyword,
                TrendCategory::Seasonal,
                self.rank_score(self.weights.seasonal, rank),
                0,
                hashtags,
            );
        }

        let slot_set = PresetCatalog::time_slot_set(slot);
        for (rank, keyword) in slot_set.keywords.iter().enumerate() {
            let mut hashtags = vec![normalize_tag(keyword)];
            if let Some(tag) = slot_set.hashtags.get(rank) {
                hashtags.push((*tag).to_string());
            }
            table.absorb(
                keyword,
                TrendCategory::TimeOfDay,
                self.rank_score(self.weights.time_of_day, rank),
                0,
                hashtags,
            );
        }

        if let Some(challenge) = PresetCatalog::weekday_challenge(now.date_naive().weekday()) {
            let rank = slot_set.keywords.len();
            table.absorb(
                challenge.keyword,
                TrendCategory::TimeOfDay,
                self.rank_score(self.weights.time_of_day, rank),
                0,
                vec![challenge.tag.to_string()],
            );
        }
    }

    fn absorb_feed(
        &self,
        table: &mut MergeTable,
        category: TrendCategory,
        weight: f64,
        items: &[RawFeedItem],
    ) {
        for (rank, item) in items.iter().enumerate() {
            let title = item.title.trim();
            if title.is_empty() {
                continue;
            }
            table.absorb(
                title,
                category,
                self.rank_score(weight, rank),
                item.growth_pct.unwrap_or(0),
                vec![normalize_tag(title)],
            );
        }
    }

    fn rank_score(&self, weight: f64, rank: usize) -> f64 {
        weight * (1.0 - rank as f64 * self.config.rank_decay).max(0.0)
    }

    async fn fetch_source(
        &self,
        kind: FeedKind,
        enabled: bool,
        locale: &Locale,
        timeout: Duration,
    ) -> Vec<RawFeedItem> {
        if !enabled {
            return Vec::new();
        }
        let Some(feed) = self.feed.as_ref() else {
            return Vec::new();
        };

        match tokio::time::timeout(timeout, feed.fetch(kind, locale)).await {
            Ok(Ok(items)) => items,
            Ok(Err(err)) => {
                warn!("{} source dropped for this cycle: {}", kind.label(), err);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "{} source timed out after {}ms",
                    kind.label(),
                    timeout.as_millis()
                );
                Vec::new()
            }
        }
    }
}

/// Accumulates candidates across sources, merging case-insensitive title
/// duplicates: scores sum, growth takes the max, hashtags union in
/// first-seen order.
struct MergeTable {
    last_seen: i64,
    order: Vec<TrendCandidate>,
    index: HashMap<String, usize>,
}

impl MergeTable {
    fn new(last_seen: i64) -> Self {
        Self {
            last_seen,
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn absorb(
        &mut self,
        title: &str,
        category: TrendCategory,
        score: f64,
        growth_pct: i32,
        hashtags: Vec<String>,
    ) {
        let normalized = normalize_text(title);
        if normalized.is_empty() {
            return;
        }

        if let Some(&idx) = self.index.get(&normalized) {
            let existing = &mut self.order[idx];
            existing.score += score;
            existing.growth_pct = existing.growth_pct.max(growth_pct);
            for tag in hashtags {
                if !tag.is_empty() && !existing.hashtags.contains(&tag) {
                    existing.hashtags.push(tag);
                }
            }
            return;
        }

        let mut unique_tags: Vec<String> = Vec::new();
        for tag in hashtags {
            if !tag.is_empty() && !unique_tags.contains(&tag) {
                unique_tags.push(tag);
            }
        }
        let id = format!("trend_{:x}", stable_hash64(&normalized));
        self.index.insert(normalized, self.order.len());
        self.order.push(TrendCandidate {
            id,
            title: title.to_string(),
            category,
            score,
            growth_pct,
            hashtags: unique_tags,
            last_seen: self.last_seen,
        });
    }

    fn finish(mut self, cap: usize) -> Vec<TrendCandidate> {
        // Stable sort keeps source-declared order on tied scores.
        self.order
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        self.order.truncate(cap);
        self.order
    }
}
