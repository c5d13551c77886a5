use actix_web::{web, HttpResponse};

use crate::core::MatchScorer;
use crate::models::ScoreRequest;

/// Configure the stateless scoring route
///
/// Needs only a `web::Data<MatchScorer>`, no database or cache.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match/score", web::post().to(score_match));
}

/// Score an inline freelancer against an inline job
///
/// POST /api/v1/match/score
///
/// Request body:
/// ```json
/// {
///   "freelancer": { "id": "string", "country": "string", ... },
///   "freelancerSkills": [{ "skillId": 1, "yearsOfExperience": 5 }],
///   "job": { "id": "string", "title": "string", ... },
///   "jobSkills": [{ "skillId": 1, "isStarred": true }]
/// }
/// ```
async fn score_match(
    scorer: web::Data<MatchScorer>,
    req: web::Json<ScoreRequest>,
) -> HttpResponse {
    let ScoreRequest {
        freelancer,
        freelancer_skills,
        job,
        job_skills,
    } = req.into_inner();

    let result = scorer.score(&freelancer, &freelancer_skills, &job, &job_skills);

    tracing::debug!(
        "Scored freelancer {} against job {}: {}",
        freelancer.id,
        job.id,
        result.score
    );

    HttpResponse::Ok().json(result)
}
