use serde::{Deserialize, Serialize};

use crate::core::RecommendationPage;

/// Paginated ranking response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse<T> {
    pub recommendations: Vec<T>,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

impl<T> From<RecommendationPage<T>> for RecommendationsResponse<T> {
    fn from(page: RecommendationPage<T>) -> Self {
        Self {
            recommendations: page.items,
            page: page.page,
            limit: page.limit,
            total_results: page.total_results,
            total_candidates: page.total_candidates,
            has_more: page.has_more,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "cachedEntries")]
    pub cached_entries: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Cache invalidation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateResponse {
    pub success: bool,
    #[serde(rename = "freelancerId")]
    pub freelancer_id: String,
}
