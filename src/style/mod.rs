pub mod analyzer;
pub mod archetypes;

pub use analyzer::{StyleAnalyzer, StyleReport};
pub use archetypes::{EmojiBucket, StyleArchetype, ARCHETYPES};
