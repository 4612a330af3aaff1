use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendCategory {
    News,
    Social,
    Search,
    Seasonal,
    TimeOfDay,
}

impl TrendCategory {
    pub fn label(self) -> &'static str {
        match self {
            TrendCategory::News => "news",
            TrendCategory::Social => "social",
            TrendCategory::Search => "search",
            TrendCategory::Seasonal => "seasonal",
            TrendCategory::TimeOfDay => "time_of_day",
        }
    }
}

/// One scored topic proposed for recommendation. Created per aggregation
/// cycle and held only in cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendCandidate {
    pub id: String,
    pub title: String,
    pub category: TrendCategory,
    pub score: f64,
    pub growth_pct: i32,
    pub hashtags: Vec<String>,
    pub last_seen: i64,
}
