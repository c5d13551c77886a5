// Integration tests for Freelance Match

use actix_web::{test, web, App, HttpResponse};
use chrono::{Duration, Utc};
use freelance_match::core::{MatchScorer, Page, Recommender};
use freelance_match::error::{handle_json_payload_error, handle_query_payload_error};
use freelance_match::models::{
    ExperienceLevel, FreelancerCandidate, FreelancerProfile, FreelancerSkill, JobCandidate,
    JobMatchQuery, JobPosting, JobSkill, JobStatus, MatchResult, ScoringWeights,
};
use freelance_match::routes;
use serde_json::json;

fn create_freelancer(id: &str, country: &str, skills: &[(i64, u32)]) -> FreelancerCandidate {
    FreelancerCandidate {
        freelancer: FreelancerProfile {
            id: id.to_string(),
            bio: "Freelance engineer".to_string(),
            years_of_experience: 5,
            preferred_project_types: Some(vec!["long-term".to_string()]),
            country: country.to_string(),
            hours_per_week: Some(40),
            languages: Some(vec!["English".to_string()]),
            expertise_keywords: Some(vec!["kubernetes".to_string(), "go".to_string()]),
        },
        skills: skills
            .iter()
            .map(|&(skill_id, years)| FreelancerSkill {
                skill_id,
                name: format!("skill-{}", skill_id),
                years_of_experience: years,
            })
            .collect(),
    }
}

fn create_job(
    id: &str,
    location: &str,
    level: ExperienceLevel,
    status: JobStatus,
    skills: &[(i64, bool)],
    age_hours: i64,
) -> JobCandidate {
    JobCandidate {
        job: JobPosting {
            id: id.to_string(),
            title: "Platform engineer".to_string(),
            description: "Operate Kubernetes clusters and Go services".to_string(),
            experience_level: level,
            location_preference: location.to_string(),
            project_type: "long-term".to_string(),
            hours_per_week: 40,
            required_languages: Some(vec!["English".to_string()]),
            status,
            created_at: Utc::now() - Duration::hours(age_hours),
        },
        skills: skills
            .iter()
            .map(|&(skill_id, is_starred)| JobSkill {
                skill_id,
                name: format!("skill-{}", skill_id),
                is_starred,
            })
            .collect(),
    }
}

#[::core::prelude::v1::test]
fn test_integration_end_to_end_recommendations() {
    let recommender = Recommender::with_default_weights();
    let candidate = create_freelancer("fl_1", "Spain", &[(1, 6), (2, 3), (3, 1)]);

    let jobs = vec![
        create_job("perfect", "Remote", ExperienceLevel::Expert, JobStatus::Open, &[(1, true), (2, false)], 0),
        create_job("partial", "Remote", ExperienceLevel::Mid, JobStatus::Open, &[(1, false), (4, true), (5, false)], 4),
        create_job("onsite", "Spain", ExperienceLevel::Entry, JobStatus::Open, &[(3, false)], 3),
        create_job("foreign", "Japan", ExperienceLevel::Expert, JobStatus::Open, &[(7, true), (8, true), (9, true)], 2),
        create_job("closed", "Remote", ExperienceLevel::Entry, JobStatus::Closed, &[(1, false)], 1),
    ];

    let page = recommender.recommend_jobs(
        &candidate.freelancer,
        &candidate.skills,
        jobs.clone(),
        None,
        Page::new(1, 10),
    );

    assert_eq!(page.total_candidates, 5);
    assert!(page.items.iter().all(|r| r.job_id != "closed"));
    assert!(page.items.iter().all(|r| r.match_result.score >= 50));
    // Ties with "onsite" are broken by recency
    assert_eq!(page.items[0].job_id, "perfect");
    assert_eq!(page.items[1].job_id, "onsite");

    for i in 1..page.items.len() {
        assert!(
            page.items[i - 1].match_result.score >= page.items[i].match_result.score,
            "Recommendations not sorted by score"
        );
    }

    // A job sharing no skills in another country drops out under a stricter threshold
    let strict = recommender.recommend_jobs(
        &candidate.freelancer,
        &candidate.skills,
        jobs,
        Some(60),
        Page::new(1, 10),
    );
    let ids: Vec<&str> = strict.items.iter().map(|r| r.job_id.as_str()).collect();
    assert_eq!(ids, vec!["perfect", "onsite", "partial"]);
}

#[::core::prelude::v1::test]
fn test_integration_rank_freelancers_for_job() {
    let recommender = Recommender::new(ScoringWeights::default(), 0);
    let job = create_job("job", "Remote", ExperienceLevel::Expert, JobStatus::Open, &[(1, true), (2, false)], 0);

    let candidates = vec![
        create_freelancer("junior", "Spain", &[(1, 1)]),
        create_freelancer("senior", "Spain", &[(1, 8), (2, 6)]),
        create_freelancer("none", "Spain", &[]),
    ];

    let page = recommender.rank_freelancers(&job.job, &job.skills, candidates, None, Page::new(1, 2));

    assert_eq!(page.total_results, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.has_more);
    assert_eq!(page.items[0].freelancer_id, "senior");
    assert_eq!(page.items[1].freelancer_id, "junior");
}

#[actix_web::test]
async fn test_score_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(MatchScorer::default()))
            .configure(routes::configure_routes),
    )
    .await;

    let body = json!({
        "freelancer": {
            "id": "fl_1",
            "country": "Spain",
            "preferredProjectTypes": ["long-term"],
            "hoursPerWeek": 40,
            "languages": ["English"],
            "expertiseKeywords": ["go"]
        },
        "freelancerSkills": [{ "skillId": 1, "name": "Go", "yearsOfExperience": 5 }],
        "job": {
            "id": "job_1",
            "title": "Go developer",
            "description": "APIs",
            "experienceLevel": "mid",
            "locationPreference": "Remote",
            "projectType": "long-term",
            "hoursPerWeek": 30,
            "createdAt": "2024-05-01T12:00:00Z"
        },
        "jobSkills": [
            { "skillId": 1, "name": "Go", "isStarred": true },
            { "skillId": 2, "name": "gRPC", "isStarred": false }
        ]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/match/score")
        .set_json(&body)
        .to_request();
    let result: MatchResult = test::call_and_read_body_json(&app, req).await;

    assert_eq!(result.skills_match_percentage, 50);
    assert_eq!(result.matching_skills.len(), 1);
    assert_eq!(result.missing_skills[0].name, "gRPC");
    assert!(result.score > 50 && result.score <= 100);
}

#[actix_web::test]
async fn test_score_endpoint_rejects_invalid_json() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(MatchScorer::default()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/match/score")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"freelancer\": 42}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
    assert_eq!(body["statusCode"], 400);
}

async fn echo_freelancer(query: web::Query<JobMatchQuery>) -> HttpResponse {
    HttpResponse::Ok().body(query.into_inner().freelancer_id)
}

#[actix_web::test]
async fn test_malformed_query_returns_json_400() {
    let app = test::init_service(
        App::new()
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .route("/jobs/{job_id}/match", web::get().to(echo_freelancer)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/jobs/job_1/match?freelancerId=fl_7")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "fl_7");

    let req = test::TestRequest::get()
        .uri("/jobs/job_1/match?page=2")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_query");
    assert_eq!(body["statusCode"], 400);
}
