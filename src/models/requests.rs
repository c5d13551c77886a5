use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{FreelancerProfile, FreelancerSkill, JobPosting, JobSkill};

/// Request for job recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendJobsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "freelancer_id", rename = "freelancerId")]
    pub freelancer_id: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
    #[validate(range(max = 100))]
    #[serde(default, alias = "min_score", rename = "minScore")]
    pub min_score: Option<u32>,
}

/// Request to rank freelancers for a job
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankFreelancersRequest {
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
    #[validate(range(max = 100))]
    #[serde(default, alias = "min_score", rename = "minScore")]
    pub min_score: Option<u32>,
}

fn default_page() -> u32 {
    1
}

/// Query for scoring a stored freelancer against a stored job
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobMatchQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "freelancer_id", rename = "freelancerId")]
    pub freelancer_id: String,
}

/// Stateless scoring request carrying both sides inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub freelancer: FreelancerProfile,
    #[serde(rename = "freelancerSkills", default)]
    pub freelancer_skills: Vec<FreelancerSkill>,
    pub job: JobPosting,
    #[serde(rename = "jobSkills", default)]
    pub job_skills: Vec<JobSkill>,
}
