use chrono::{DateTime, Datelike, Timelike, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::{EngineConfig, RecommendConfig};
use crate::error::{EngineError, Result};
use crate::presets::{PresetCatalog, TimeSlot};
use crate::providers::{AffinityBackend, Clock, LocaleProvider, SearchHistoryProvider, SearchQuery};
use crate::recommend::HashtagAffinity;
use crate::trends::{TrendAggregator, TrendCandidate, TrendCategory};
use crate::{clamp01, normalize_tag, normalize_text};

const USAGE_NORM: f64 = 10.0;
const DAY_SECS: i64 = 86_400;

/// Very-first-use fallback, served only when every source is empty.
const DEFAULT_TAGS: &[&str] = &[
    "daily",
    "lifestyle",
    "mood",
    "inspiration",
    "photooftheday",
    "community",
    "create",
    "explore",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TagCategory {
    News,
    Social,
    Search,
    Seasonal,
    TimeOfDay,
    Personal,
}

impl From<TrendCategory> for TagCategory {
    fn from(category: TrendCategory) -> Self {
        match category {
            TrendCategory::News => TagCategory::News,
            TrendCategory::Social => TagCategory::Social,
            TrendCategory::Search => TagCategory::Search,
            TrendCategory::Seasonal => TagCategory::Seasonal,
            TrendCategory::TimeOfDay => TagCategory::TimeOfDay,
        }
    }
}

struct ScoredTag {
    tag: String,
    score: f64,
    category: TagCategory,
}

pub struct HashtagRecommender {
    config: RecommendConfig,
    rank_decay: f64,
    trends: Arc<TrendAggregator>,
    affinity: Arc<dyn AffinityBackend>,
    search: Arc<dyn SearchHistoryProvider>,
    clock: Arc<dyn Clock>,
    locale: Arc<dyn LocaleProvider>,
    rng: Mutex<StdRng>,
    write_gate: Mutex<()>,
}

impl HashtagRecommender {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &EngineConfig,
        trends: Arc<TrendAggregator>,
        affinity: Arc<dyn AffinityBackend>,
        search: Arc<dyn SearchHistoryProvider>,
        clock: Arc<dyn Clock>,
        locale: Arc<dyn LocaleProvider>,
        rng_seed: u64,
    ) -> Self {
        Self {
            config: config.recommend.clone(),
            rank_decay: config.trends.rank_decay,
            trends,
            affinity,
            search,
            clock,
            locale,
            rng: Mutex::new(StdRng::seed_from_u64(rng_seed)),
            write_gate: Mutex::new(()),
        }
    }

    /// Up to `count` unique hashtags, ranked by the composite score and
    /// shuffled within the diversity-balanced pool. Affinity-store failures
    /// propagate; every other source degrades silently.
    pub async fn recommend(
        &self,
        user_id: &str,
        prompt_text: Option<&str>,
        count: usize,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let locale = self.locale.device_locale();
        let trends = self.trends.get_trends(&locale, now).await;
        let affinity = self.affinity.load(user_id).await?;
        let queries = match self
            .search
            .recent_queries(user_id, self.config.search_query_limit)
            .await
        {
            Ok(queries) => queries,
            Err(err) => {
                warn!("search history unavailable: {}", err);
                Vec::new()
            }
        };

        let scored = match self.assemble(&trends, &affinity, &queries, prompt_text, now) {
            Ok(scored) => scored,
            Err(EngineError::InsufficientData(_)) => {
                return Ok(DEFAULT_TAGS
                    .iter()
                    .take(count)
                    .map(|tag| (*tag).to_string())
                    .collect());
            }
            Err(err) => return Err(err),
        };

        let mut rng = self.rng.lock().await;
        Ok(select(scored, count, &mut rng))
    }

    /// Learning loop: applied under the write gate and durably saved before
    /// returning, so the next `recommend` in the session observes it.
    pub async fn record_post_saved(
        &self,
        user_id: &str,
        hashtags: &[String],
        category: &str,
    ) -> Result<()> {
        if hashtags.is_empty() {
            return Ok(());
        }

        let _gate = self.write_gate.lock().await;
        let now_ts = self.clock.now().timestamp();
        let mut map = self.affinity.load(user_id).await?;
        for raw in hashtags {
            let tag = normalize_tag(raw);
            if tag.is_empty() {
                continue;
            }
            let entry = map.entry(tag.clone()).or_insert_with(|| HashtagAffinity {
                tag,
                usage_count: 0,
                last_used_at: now_ts,
                category: category.to_string(),
            });
            entry.usage_count += 1;
            entry.last_used_at = now_ts;
        }
        self.affinity.save(user_id, map).await
    }

    pub async fn reset_personalization(&self, user_id: &str) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.affinity.save(user_id, HashMap::new()).await
    }

    fn assemble(
        &self,
        trends: &[TrendCandidate],
        affinity: &HashMap<String, HashtagAffinity>,
        queries: &[SearchQuery],
        prompt_text: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredTag>> {
        let mut order: Vec<String> = Vec::new();
        let mut table: HashMap<String, ScoredTag> = HashMap::new();

        for (rank, candidate) in trends.iter().enumerate() {
            let decay = (1.0 - rank as f64 * self.rank_decay).max(0.0);
            for tag in &candidate.hashtags {
                add(
                    &mut order,
                    &mut table,
                    tag,
                    self.config.trend_weight * decay,
                    TagCategory::from(candidate.category),
                );
            }
        }

        let seasonal = PresetCatalog::seasonal_set(now.date_naive());
        let slot_set = PresetCatalog::time_slot_set(TimeSlot::from_hour(now.hour()));
        let mut time_tags: Vec<(&str, TagCategory)> = Vec::new();
        for tag in slot_set.hashtags.iter().copied() {
            time_tags.push((tag, TagCategory::TimeOfDay));
        }
        for tag in seasonal.hashtags.iter().copied() {
            time_tags.push((tag, TagCategory::Seasonal));
        }
        if let Some(challenge) = PresetCatalog::weekday_challenge(now.date_naive().weekday()) {
            time_tags.push((challenge.tag, TagCategory::TimeOfDay));
        }
        for (rank, (tag, category)) in time_tags.iter().enumerate() {
            let decay = (1.0 - rank as f64 * self.rank_decay).max(0.0);
            add(
                &mut order,
                &mut table,
                tag,
                self.config.time_weight * decay,
                *category,
            );
        }

        // Sorted so scoring stays deterministic regardless of map order.
        let mut personal: Vec<&HashtagAffinity> = affinity.values().collect();
        personal.sort_by(|a, b| a.tag.cmp(&b.tag));
        let now_ts = now.timestamp();
        for aff in personal {
            let usage = clamp01(aff.usage_count as f64 / USAGE_NORM);
            let factor = usage * recency_bonus(now_ts - aff.last_used_at);
            add(
                &mut order,
                &mut table,
                &aff.tag,
                self.config.affinity_weight * factor,
                TagCategory::Personal,
            );
        }

        let normalized_queries: Vec<String> = queries
            .iter()
            .map(|query| normalize_text(&query.text))
            .filter(|query| !query.is_empty())
            .collect();
        if !normalized_queries.is_empty() {
            for tag in &order {
                let hit = normalized_queries.iter().any(|query| {
                    query.contains(tag.as_str()) || tag.contains(&query.replace(' ', ""))
                });
                if hit {
                    if let Some(entry) = table.get_mut(tag) {
                        entry.score += self.config.search_weight;
                    }
                }
            }
        }

        if let Some(prompt) = prompt_text {
            let compact = normalize_text(prompt).replace(' ', "");
            if !compact.is_empty() {
                for tag in &order {
                    if compact.contains(tag.as_str()) {
                        if let Some(entry) = table.get_mut(tag) {
                            entry.score += self.config.prompt_bonus;
                        }
                    }
                }
            }
        }

        if order.is_empty() {
            return Err(EngineError::InsufficientData(
                "no candidate hashtags from any source".to_string(),
            ));
        }

        Ok(order
            .iter()
            .filter_map(|tag| table.remove(tag))
            .collect())
    }
}

fn add(
    order: &mut Vec<String>,
    table: &mut HashMap<String, ScoredTag>,
    raw: &str,
    points: f64,
    category: TagCategory,
) {
    let tag = normalize_tag(raw);
    if tag.is_empty() {
        return;
    }
    match table.get_mut(&tag) {
        Some(existing) => existing.score += points,
        None => {
            order.push(tag.clone());
            table.insert(
                tag.clone(),
                ScoredTag {
                    tag,
                    score: points,
                    category,
                },
            );
        }
    }
}

fn recency_bonus(age_secs: i64) -> f64 {
    if age_secs < DAY_SECS {
        1.5
    } else if age_secs < 7 * DAY_SECS {
        1.2
    } else if age_secs < 30 * DAY_SECS {
        1.0
    } else {
        0.8
    }
}

/// Diversity-aware selection: top `2×count` by composite score, one tag per
/// category per round in a shuffled category order, then a final shuffle of
/// the pool. Every non-empty category yields a tag before any yields two.
fn select(mut scored: Vec<ScoredTag>, count: usize, rng: &mut StdRng) -> Vec<String> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(2 * count);

    let mut buckets: Vec<(TagCategory, VecDeque<ScoredTag>)> = Vec::new();
    for tag in scored {
        match buckets.iter_mut().find(|(cat, _)| *cat == tag.category) {
            Some((_, bucket)) => bucket.push_back(tag),
            None => {
                let category = tag.category;
                buckets.push((category, VecDeque::from([tag])));
            }
        }
    }

    let total: usize = buckets.iter().map(|(_, bucket)| bucket.len()).sum();
    // Pool target is raised to the category count so a dominant category
    // cannot starve small ones out of the quota.
    let pool_target = ((count * 3 + 1) / 2).max(buckets.len()).min(total);

    let mut visit: Vec<usize> = (0..buckets.len()).collect();
    visit.shuffle(rng);

    let mut pool: Vec<ScoredTag> = Vec::new();
    while pool.len() < pool_target {
        let mut progressed = false;
        for &idx in &visit {
            if pool.len() >= pool_target {
                break;
            }
            if let Some(tag) = buckets[idx].1.pop_front() {
                pool.push(tag);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    pool.shuffle(rng);
    pool.truncate(count);
    pool.into_iter().map(|scored| scored.tag).collect()
}
