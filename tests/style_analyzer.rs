use async_trait::async_trait;
use std::sync::Arc;

use trendmuse::providers::{Post, PostHistoryProvider};
use trendmuse::style::StyleAnalyzer;
use trendmuse::Result;

struct StubHistory {
    posts: Vec<Post>,
}

#[async_trait]
impl PostHistoryProvider for StubHistory {
    async fn list_posts(&self, _user_id: &str) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }
}

fn analyzer_with(posts: Vec<Post>) -> StyleAnalyzer {
    StyleAnalyzer::new(Arc::new(StubHistory { posts }))
}

fn post(id: &str, content: &str, hashtags: &[&str], category: &str, tone: &str, ts: i64) -> Post {
    Post {
        id: id.to_string(),
        content: content.to_string(),
        hashtags: hashtags.iter().map(|tag| (*tag).to_string()).collect(),
        category: category.to_string(),
        tone: tone.to_string(),
        created_at: ts,
    }
}

fn short_posts() -> Vec<Post> {
    // 12 posts, 28-42 chars, no emojis, at most one hashtag each.
    let contents = [
        "a slow walk before the day begins",
        "tea first, everything else after",
        "the desk is clear and so am i",
        "rain on the window, nothing to do",
        "one page of the notebook filled",
        "the plants got watered today",
        "early light across the floor",
        "a short list, mostly done now",
        "bread, butter, and a quiet hour",
        "the chair by the window again",
        "folded laundry and an open door",
        "small rooms hold the best hours",
    ];
    contents
        .iter()
        .enumerate()
        .map(|(idx, content)| {
            post(
                &format!("post-{}", idx),
                content,
                &["daily"],
                "daily",
                "calm",
                1_720_000_000 + idx as i64 * 3_600,
            )
        })
        .collect()
}

#[test]
fn empty_corpus_returns_the_default_report() {
    let analyzer = analyzer_with(Vec::new());

    let report = analyzer.analyze(&[]);

    assert_eq!(report.dominant_archetype, "minimalist");
    assert_eq!(report.consistency, 50);
    assert_eq!(report.diversity, 50);
    assert!(report.per_archetype_score.values().all(|score| *score == 0));
    assert!(!report.recommendations.is_empty());
}

#[test]
fn analysis_is_deterministic_for_a_fixed_corpus() {
    let analyzer = analyzer_with(Vec::new());
    let posts = short_posts();

    let first = analyzer.analyze(&posts);
    let second = analyzer.analyze(&posts);

    assert_eq!(first.per_archetype_score, second.per_archetype_score);
    assert_eq!(first.dominant_archetype, second.dominant_archetype);
    assert_eq!(first.consistency, second.consistency);
    assert_eq!(first.diversity, second.diversity);
    assert_eq!(first.recommendations, second.recommendations);
}

#[test]
fn short_plain_posts_select_the_minimalist_archetype() {
    let analyzer = analyzer_with(Vec::new());

    let report = analyzer.analyze(&short_posts());

    assert_eq!(report.dominant_archetype, "minimalist");
    assert!(report.consistency > 70, "consistency {}", report.consistency);
}

#[test]
fn per_archetype_scores_stay_within_bounds() {
    let analyzer = analyzer_with(Vec::new());

    let report = analyzer.analyze(&short_posts());

    for score in report.per_archetype_score.values() {
        assert!(*score <= 100);
    }
    assert!(report.diversity <= 100);
    assert!(report.consistency <= 100);
}

#[test]
fn underpowered_corpus_defaults_consistency() {
    let analyzer = analyzer_with(Vec::new());
    let posts = vec![
        post("a", "short one", &[], "daily", "calm", 1),
        post("b", "a much much much longer second entry here", &[], "daily", "calm", 2),
        post("c", "mid sized third entry", &[], "daily", "calm", 3),
    ];

    let report = analyzer.analyze(&posts);

    assert_eq!(report.consistency, 50);
}

#[test]
fn varied_corpus_scores_high_diversity() {
    let analyzer = analyzer_with(Vec::new());
    let posts = vec![
        post("a", "first entry", &["travel", "sea"], "travel", "excited", 1),
        post("b", "second entry", &["recipe", "bread"], "food", "warm", 2),
        post("c", "third entry", &["desk", "notes"], "work", "serious", 3),
        post("d", "fourth entry", &["trail", "peak"], "outdoors", "calm", 4),
        post("e", "fifth entry", &["paint", "canvas"], "art", "playful", 5),
    ];

    let report = analyzer.analyze(&posts);

    assert_eq!(report.diversity, 100);
}

#[tokio::test]
async fn analyze_user_reads_from_the_history_provider() {
    let posts = short_posts();
    let analyzer = analyzer_with(posts.clone());

    let via_provider = analyzer.analyze_user("user-1").await.unwrap();
    let direct = analyzer.analyze(&posts);

    assert_eq!(via_provider.per_archetype_score, direct.per_archetype_score);
    assert_eq!(via_provider.dominant_archetype, direct.dominant_archetype);
}
