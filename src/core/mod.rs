// Core algorithm exports
pub mod filters;
pub mod pagination;
pub mod recommender;
pub mod scoring;

pub use filters::{is_recommendable, meets_threshold, DEFAULT_MIN_SCORE};
pub use pagination::{Page, PaginationError};
pub use recommender::{RecommendationPage, Recommender};
pub use scoring::{calculate_match_score, MatchScorer};
