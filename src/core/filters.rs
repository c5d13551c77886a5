use crate::models::{JobPosting, MatchResult};

/// Default minimum score for a job to be recommended
pub const DEFAULT_MIN_SCORE: u32 = 50;

/// Check if a job can be shown to freelancers at all
///
/// Closed and draft postings never reach the scorer.
#[inline]
pub fn is_recommendable(job: &JobPosting) -> bool {
    job.is_open()
}

/// Check if a scored match clears the recommendation threshold
#[inline]
pub fn meets_threshold(result: &MatchResult, min_score: u32) -> bool {
    result.score >= min_score
}
