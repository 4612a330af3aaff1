use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::error::Result;
use crate::normalize_tag;
use crate::providers::{Post, PostHistoryProvider};
use crate::style::archetypes::{EmojiBucket, StyleArchetype, ARCHETYPES};

const RECENT_WINDOW: usize = 10;
const MIN_SAMPLE: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleReport {
    pub dominant_archetype: String,
    pub per_archetype_score: BTreeMap<String, u32>,
    pub consistency: u32,
    pub diversity: u32,
    pub recommendations: Vec<String>,
}

pub struct StyleAnalyzer {
    history: Arc<dyn PostHistoryProvider>,
}

impl StyleAnalyzer {
    pub fn new(history: Arc<dyn PostHistoryProvider>) -> Self {
        Self { history }
    }

    pub async fn analyze_user(&self, user_id: &str) -> Result<StyleReport> {
        let posts = self.history.list_posts(user_id).await?;
        Ok(self.analyze(&posts))
    }

    /// Deterministic report over the given snapshot; an empty corpus gets
    /// the documented cold-start defaults instead of an error.
    pub fn analyze(&self, posts: &[Post]) -> StyleReport {
        if posts.is_empty() {
            return default_report();
        }

        let mut per_archetype_score = BTreeMap::new();
        for archetype in ARCHETYPES {
            let total: u32 = posts.iter().map(|post| score_post(archetype, post)).sum();
            let avg = (total as f64 / posts.len() as f64).round() as u32;
            per_archetype_score.insert(archetype.id.to_string(), avg.min(100));
        }

        let mut dominant = &ARCHETYPES[0];
        let mut best = *per_archetype_score.get(dominant.id).unwrap_or(&0);
        for archetype in &ARCHETYPES[1..] {
            let score = *per_archetype_score.get(archetype.id).unwrap_or(&0);
            if score > best {
                best = score;
                dominant = archetype;
            }
        }

        let consistency = consistency_score(posts);
        let diversity = diversity_score(posts);
        let recommendations = build_recommendations(dominant, best, consistency, diversity);

        StyleReport {
            dominant_archetype: dominant.id.to_string(),
            per_archetype_score,
            consistency,
            diversity,
            recommendations,
        }
    }
}

fn score_post(archetype: &StyleArchetype, post: &Post) -> u32 {
    let mut score = 0u32;

    let length = post.content.chars().count();
    if length >= archetype.min_len && length <= archetype.max_len {
        score += 10;
    }

    let lowered = post.content.to_lowercase();
    for keyword in archetype.keywords {
        if lowered.contains(keyword) {
            score += 5;
        }
    }

    if EmojiBucket::from_count(emoji_count(&post.content)) == archetype.emoji_bucket {
        score += 5;
    }

    let tags = post.hashtags.len();
    if tags >= archetype.min_hashtags && tags <= archetype.max_hashtags {
        score += 5;
    }

    score
}

fn emoji_count(text: &str) -> usize {
    text.chars().filter(|ch| (*ch as u32) > 0x7f).count()
}

fn consistency_score(posts: &[Post]) -> u32 {
    if posts.len() < MIN_SAMPLE {
        return 50;
    }

    let mut recent: Vec<&Post> = posts.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_WINDOW);

    let lengths: Vec<f64> = recent
        .iter()
        .map(|post| post.content.chars().count() as f64)
        .collect();
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    if mean <= f64::EPSILON {
        return 50;
    }

    let variance = lengths
        .iter()
        .map(|length| (length - mean).powi(2))
        .sum::<f64>()
        / lengths.len() as f64;
    let std_dev = variance.sqrt();

    (100.0 - 100.0 * std_dev / mean).max(0.0).round() as u32
}

fn diversity_score(posts: &[Post]) -> u32 {
    let post_count = posts.len() as f64;

    let unique_tags: HashSet<String> = posts
        .iter()
        .flat_map(|post| post.hashtags.iter())
        .map(|tag| normalize_tag(tag))
        .filter(|tag| !tag.is_empty())
        .collect();
    let unique_categories: HashSet<String> = posts
        .iter()
        .map(|post| post.category.trim().to_lowercase())
        .filter(|category| !category.is_empty())
        .collect();
    let unique_tones: HashSet<String> = posts
        .iter()
        .map(|post| post.tone.trim().to_lowercase())
        .filter(|tone| !tone.is_empty())
        .collect();

    let tag_ratio = (100.0 * unique_tags.len() as f64 / post_count).min(100.0);
    let category_ratio = (100.0 * unique_categories.len() as f64 / 5.0).min(100.0);
    let tone_ratio = (100.0 * unique_tones.len() as f64 / 4.0).min(100.0);

    ((tag_ratio + category_ratio + tone_ratio) / 3.0).round() as u32
}

fn build_recommendations(
    dominant: &StyleArchetype,
    dominant_score: u32,
    consistency: u32,
    diversity: u32,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if consistency < 70 {
        recommendations.push(
            "Your post lengths swing widely; keeping length and tone steadier makes your voice easier to recognize.".to_string(),
        );
    }
    if diversity < 50 {
        recommendations.push(
            "Most posts cover similar ground; trying a few new topics or tags would broaden your reach.".to_string(),
        );
    }
    if diversity > 80 {
        recommendations.push(
            "You range across many topics; focusing on fewer themes can sharpen your identity.".to_string(),
        );
    }
    if dominant_score < 40 {
        recommendations.push(
            "No single style stands out yet; leaning into one voice will make your feed feel intentional.".to_string(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push(format!(
            "Your {} voice is working; keep building on it.",
            dominant.name
        ));
    }

    recommendations
}

fn default_report() -> StyleReport {
    let per_archetype_score = ARCHETYPES
        .iter()
        .map(|archetype| (archetype.id.to_string(), 0))
        .collect();
    StyleReport {
        dominant_archetype: ARCHETYPES[0].id.to_string(),
        per_archetype_score,
        consistency: 50,
        diversity: 50,
        recommendations: vec![
            "Write a few posts to unlock a personalized style profile.".to_string(),
            "Mix lengths and topics early on to discover what fits you.".to_string(),
        ],
    }
}
