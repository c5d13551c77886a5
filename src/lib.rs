//! Freelance Match - job and freelancer matching service for an IT freelance marketplace
//!
//! This library provides the match scorer used to recommend jobs to freelancers
//! and to rank freelancers for a job, plus the HTTP service around it.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, MatchScorer, Page, RecommendationPage, Recommender};
pub use error::ApiError;
pub use models::{
    ExperienceLevel, FreelancerProfile, FreelancerSkill, JobPosting, JobSkill, MatchResult,
    ScoringWeights,
};
