pub mod affinity;
pub mod recommender;

pub use affinity::{HashtagAffinity, JsonAffinityStore};
pub use recommender::HashtagRecommender;
