use actix_web::{web, HttpResponse};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{Page, Recommender};
use crate::error::ApiError;
use crate::models::{
    FreelancerRecommendation, HealthResponse, InvalidateResponse, JobMatchQuery,
    JobRecommendation, RankFreelancersRequest, RecommendJobsRequest, RecommendationsResponse,
};
use crate::services::{CacheError, CacheKey, CacheManager, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub recommender: Recommender,
    pub matching: MatchingSettings,
}

impl AppState {
    fn page(&self, page: u32, limit: Option<u32>) -> Result<Page, ApiError> {
        Ok(self.matching.page(page, limit)?)
    }

    /// Cached value for `key`, treating any cache failure as a miss
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(value) => Some(value),
            Err(CacheError::CacheMiss(_)) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store_cached<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommendations/jobs", web::post().to(recommend_jobs))
        .route("/jobs/{job_id}/freelancers", web::post().to(rank_freelancers))
        .route("/jobs/{job_id}/match", web::get().to(job_match))
        .route(
            "/freelancers/{freelancer_id}/invalidate",
            web::post().to(invalidate_recommendations),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let pg_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_entries: state.cache.l1_entries(),
    })
}

/// Job recommendations endpoint
///
/// POST /api/v1/recommendations/jobs
///
/// Request body:
/// ```json
/// {
///   "freelancerId": "string",
///   "page": 1,
///   "limit": 10,
///   "minScore": 50
/// }
/// ```
async fn recommend_jobs(
    state: web::Data<AppState>,
    req: web::Json<RecommendJobsRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let page = state.page(req.page, req.limit)?;
    let min_score = req.min_score.unwrap_or(state.recommender.min_score());
    let freelancer_id = &req.freelancer_id;

    let cache_key = CacheKey::job_recommendations(freelancer_id, page.page, page.limit, min_score);
    if let Some(cached) = state
        .cached::<RecommendationsResponse<JobRecommendation>>(&cache_key)
        .await
    {
        tracing::debug!("Serving cached recommendations for {}", freelancer_id);
        return Ok(HttpResponse::Ok().json(cached));
    }

    tracing::info!(
        "Recommending jobs for freelancer: {}, page: {}, limit: {}",
        freelancer_id,
        page.page,
        page.limit
    );

    let (freelancer, skills, candidates) = tokio::try_join!(
        state.store.get_freelancer(freelancer_id),
        state.store.get_freelancer_skills(freelancer_id),
        state.store.list_open_jobs(state.matching.candidate_limit),
    )?;

    let result = state
        .recommender
        .recommend_jobs(&freelancer, &skills, candidates, Some(min_score), page);

    let response = RecommendationsResponse::from(result);

    tracing::info!(
        "Returning {} recommendations for freelancer {} ({} above threshold)",
        response.recommendations.len(),
        freelancer_id,
        response.total_results
    );

    state.store_cached(&cache_key, &response).await;

    Ok(HttpResponse::Ok().json(response))
}

/// Freelancer ranking endpoint for employers
///
/// POST /api/v1/jobs/{job_id}/freelancers
///
/// Request body:
/// ```json
/// {
///   "page": 1,
///   "limit": 10,
///   "minScore": 50
/// }
/// ```
async fn rank_freelancers(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<RankFreelancersRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let job_id = path.into_inner();
    let page = state.page(req.page, req.limit)?;
    let min_score = req.min_score.unwrap_or(state.recommender.min_score());

    let cache_key = CacheKey::freelancer_ranking(&job_id, page.page, page.limit, min_score);
    if let Some(cached) = state
        .cached::<RecommendationsResponse<FreelancerRecommendation>>(&cache_key)
        .await
    {
        return Ok(HttpResponse::Ok().json(cached));
    }

    tracing::info!("Ranking freelancers for job: {}", job_id);

    let (job, job_skills, candidates) = tokio::try_join!(
        state.store.get_job(&job_id),
        state.store.get_job_skills(&job_id),
        state.store.list_freelancers(state.matching.candidate_limit),
    )?;

    let result = state
        .recommender
        .rank_freelancers(&job, &job_skills, candidates, Some(min_score), page);

    let response = RecommendationsResponse::from(result);
    state.store_cached(&cache_key, &response).await;

    Ok(HttpResponse::Ok().json(response))
}

/// Score one stored freelancer against one stored job
///
/// GET /api/v1/jobs/{job_id}/match?freelancerId={freelancerId}
async fn job_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<JobMatchQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let job_id = path.into_inner();
    let freelancer_id = &query.freelancer_id;

    let (freelancer, skills, job, job_skills) = tokio::try_join!(
        state.store.get_freelancer(freelancer_id),
        state.store.get_freelancer_skills(freelancer_id),
        state.store.get_job(&job_id),
        state.store.get_job_skills(&job_id),
    )?;

    let result = state
        .recommender
        .scorer()
        .score(&freelancer, &skills, &job, &job_skills);

    Ok(HttpResponse::Ok().json(result))
}

/// Drop cached recommendation pages after a profile change
///
/// POST /api/v1/freelancers/{freelancer_id}/invalidate
async fn invalidate_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let freelancer_id = path.into_inner();
    let pattern = CacheKey::job_recommendations_pattern(&freelancer_id);

    let success = match state.cache.invalidate_pattern(&pattern).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to invalidate cache for {}: {}", freelancer_id, e);
            false
        }
    };

    HttpResponse::Ok().json(InvalidateResponse {
        success,
        freelancer_id,
    })
}
