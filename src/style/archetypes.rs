#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiBucket {
    None,
    Light,
    Heavy,
}

impl EmojiBucket {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => EmojiBucket::None,
            1..=2 => EmojiBucket::Light,
            _ => EmojiBucket::Heavy,
        }
    }
}

/// A writing-style profile used as a classification target. Declaration
/// order is load-bearing: ties resolve to the first-listed archetype.
#[derive(Debug, Clone, Copy)]
pub struct StyleArchetype {
    pub id: &'static str,
    pub name: &'static str,
    pub min_len: usize,
    pub max_len: usize,
    pub keywords: &'static [&'static str],
    pub emoji_bucket: EmojiBucket,
    pub min_hashtags: usize,
    pub max_hashtags: usize,
    pub ai_tone: &'static str,
}

pub static ARCHETYPES: &[StyleArchetype] = &[
    StyleArchetype {
        id: "minimalist",
        name: "Minimalist",
        min_len: 1,
        max_len: 80,
        keywords: &["less", "simple", "quiet", "pause", "still"],
        emoji_bucket: EmojiBucket::None,
        min_hashtags: 0,
        max_hashtags: 1,
        ai_tone: "calm and concise",
    },
    StyleArchetype {
        id: "storyteller",
        name: "Storyteller",
        min_len: 200,
        max_len: 1200,
        keywords: &["story", "remember", "journey", "moment", "felt"],
        emoji_bucket: EmojiBucket::Light,
        min_hashtags: 1,
        max_hashtags: 3,
        ai_tone: "warm and narrative",
    },
    StyleArchetype {
        id: "informer",
        name: "Informer",
        min_len: 120,
        max_len: 600,
        keywords: &["tips", "guide", "how", "learn", "why"],
        emoji_bucket: EmojiBucket::None,
        min_hashtags: 2,
        max_hashtags: 5,
        ai_tone: "clear and instructive",
    },
    StyleArchetype {
        id: "entertainer",
        name: "Entertainer",
        min_len: 60,
        max_len: 300,
        keywords: &["lol", "fun", "haha", "joke", "wild"],
        emoji_bucket: EmojiBucket::Heavy,
        min_hashtags: 1,
        max_hashtags: 4,
        ai_tone: "playful and upbeat",
    },
    StyleArchetype {
        id: "trendsetter",
        name: "Trendsetter",
        min_len: 60,
        max_len: 250,
        keywords: &["new", "trend", "drop", "launch", "first"],
        emoji_bucket: EmojiBucket::Light,
        min_hashtags: 3,
        max_hashtags: 8,
        ai_tone: "bold and current",
    },
    StyleArchetype {
        id: "motivator",
        name: "Motivator",
        min_len: 100,
        max_len: 400,
        keywords: &["dream", "goal", "believe", "grow", "start"],
        emoji_bucket: EmojiBucket::Light,
        min_hashtags: 1,
        max_hashtags: 3,
        ai_tone: "encouraging and direct",
    },
];
