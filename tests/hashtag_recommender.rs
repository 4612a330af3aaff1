use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use trendmuse::config::EngineConfig;
use trendmuse::providers::{
    AffinityBackend, Clock, Locale, LocaleProvider, SearchHistoryProvider, SearchQuery,
};
use trendmuse::recommend::{HashtagAffinity, HashtagRecommender};
use trendmuse::trends::TrendAggregator;
use trendmuse::{EngineError, Result};

struct MemoryAffinity {
    users: RwLock<HashMap<String, HashMap<String, HashtagAffinity>>>,
}

impl MemoryAffinity {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            users: RwLock::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl AffinityBackend for MemoryAffinity {
    async fn load(&self, user_id: &str) -> Result<HashMap<String, HashtagAffinity>> {
        let guard = self.users.read().await;
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }

    async fn save(&self, user_id: &str, map: HashMap<String, HashtagAffinity>) -> Result<()> {
        let mut guard = self.users.write().await;
        guard.insert(user_id.to_string(), map);
        Ok(())
    }
}

struct FailingAffinity;

#[async_trait]
impl AffinityBackend for FailingAffinity {
    async fn load(&self, _user_id: &str) -> Result<HashMap<String, HashtagAffinity>> {
        Err(EngineError::PersistenceFailure("store offline".to_string()))
    }

    async fn save(&self, _user_id: &str, _map: HashMap<String, HashtagAffinity>) -> Result<()> {
        Err(EngineError::PersistenceFailure("store offline".to_string()))
    }
}

struct StubSearch {
    queries: Vec<&'static str>,
}

#[async_trait]
impl SearchHistoryProvider for StubSearch {
    async fn recent_queries(&self, _user_id: &str, limit: usize) -> Result<Vec<SearchQuery>> {
        Ok(self
            .queries
            .iter()
            .take(limit)
            .map(|text| SearchQuery {
                text: (*text).to_string(),
                timestamp: 0,
            })
            .collect())
    }
}

struct MondayNoonClock;

impl Clock for MondayNoonClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 12, 0, 0).unwrap()
    }
}

struct FixedLocale;

impl LocaleProvider for FixedLocale {
    fn device_locale(&self) -> Locale {
        Locale::new("en", "US")
    }
}

fn build(
    seed: u64,
    affinity: Arc<dyn AffinityBackend>,
    queries: Vec<&'static str>,
) -> HashtagRecommender {
    let config = EngineConfig::default();
    let trends = Arc::new(TrendAggregator::new(&config, None));
    HashtagRecommender::new(
        &config,
        trends,
        affinity,
        Arc::new(StubSearch { queries }),
        Arc::new(MondayNoonClock),
        Arc::new(FixedLocale),
        seed,
    )
}

#[tokio::test]
async fn returns_at_most_count_unique_tags() {
    let recommender = build(7, MemoryAffinity::new(), Vec::new());

    let tags = recommender.recommend("user-1", None, 5).await.unwrap();

    assert_eq!(tags.len(), 5);
    let unique: HashSet<&String> = tags.iter().collect();
    assert_eq!(unique.len(), tags.len());
}

#[tokio::test]
async fn zero_count_returns_empty() {
    let recommender = build(7, MemoryAffinity::new(), Vec::new());
    let tags = recommender.recommend("user-1", None, 0).await.unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn selection_is_reproducible_for_a_fixed_seed() {
    let first = build(42, MemoryAffinity::new(), Vec::new())
        .recommend("user-1", None, 6)
        .await
        .unwrap();
    let second = build(42, MemoryAffinity::new(), Vec::new())
        .recommend("user-1", None, 6)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn saved_posts_feed_back_into_recommendations() {
    let affinity = MemoryAffinity::new();
    let recommender = build(9, affinity, Vec::new());

    for _ in 0..3 {
        recommender
            .record_post_saved("user-1", &["#Coffee".to_string()], "lifestyle")
            .await
            .unwrap();
    }

    // Wide enough to cover the whole candidate pool.
    let tags = recommender.recommend("user-1", None, 30).await.unwrap();
    assert!(tags.contains(&"coffee".to_string()));
}

#[tokio::test]
async fn affinity_is_scoped_per_user() {
    let affinity = MemoryAffinity::new();
    let recommender = build(9, affinity, Vec::new());

    recommender
        .record_post_saved("user-1", &["#Coffee".to_string()], "lifestyle")
        .await
        .unwrap();

    let other = recommender.recommend("user-2", None, 30).await.unwrap();
    assert!(!other.contains(&"coffee".to_string()));
}

#[tokio::test]
async fn reset_personalization_wipes_learned_tags() {
    let affinity = MemoryAffinity::new();
    let recommender = build(9, affinity, Vec::new());

    recommender
        .record_post_saved("user-1", &["#Coffee".to_string()], "lifestyle")
        .await
        .unwrap();
    recommender.reset_personalization("user-1").await.unwrap();

    let tags = recommender.recommend("user-1", None, 30).await.unwrap();
    assert!(!tags.contains(&"coffee".to_string()));
}

#[tokio::test]
async fn persistence_failure_surfaces_to_the_caller() {
    let recommender = build(7, Arc::new(FailingAffinity), Vec::new());

    let err = recommender.recommend("user-1", None, 5).await.unwrap_err();
    assert!(matches!(err, EngineError::PersistenceFailure(_)));

    let err = recommender
        .record_post_saved("user-1", &["coffee".to_string()], "lifestyle")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PersistenceFailure(_)));
}

#[tokio::test]
async fn search_history_lifts_matching_preset_tags() {
    // "summer" is a seasonal preset tag for the fixed July clock.
    let with_search = build(11, MemoryAffinity::new(), vec!["summer outfit ideas"]);
    let tags = with_search.recommend("user-1", None, 30).await.unwrap();
    assert!(tags.contains(&"summer".to_string()));
}
