// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ExperienceLevel, FreelancerCandidate, FreelancerProfile, FreelancerRecommendation,
    FreelancerSkill, JobCandidate, JobPosting, JobRecommendation, JobSkill, JobStatus,
    MatchResult, MatchingSkill, MissingSkill, ScoreBreakdown, ScoringWeights,
    DEFAULT_WEEKLY_HOURS,
};
pub use requests::{JobMatchQuery, RankFreelancersRequest, RecommendJobsRequest, ScoreRequest};
pub use responses::{ErrorResponse, HealthResponse, InvalidateResponse, RecommendationsResponse};
