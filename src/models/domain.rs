use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Freelancer profile as loaded from the marketplace database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub id: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "yearsOfExperience", default)]
    pub years_of_experience: u32,
    #[serde(rename = "preferredProjectTypes", default)]
    pub preferred_project_types: Option<Vec<String>>,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "hoursPerWeek", default)]
    pub hours_per_week: Option<u32>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(rename = "expertiseKeywords", default)]
    pub expertise_keywords: Option<Vec<String>>,
}

impl FreelancerProfile {
    /// Preferred weekly hours, defaulting to a full-time week
    pub fn preferred_hours(&self) -> u32 {
        self.hours_per_week.unwrap_or(DEFAULT_WEEKLY_HOURS)
    }
}

/// Weekly hours assumed when a freelancer has not recorded a preference
pub const DEFAULT_WEEKLY_HOURS: u32 = 40;

/// A skill a freelancer lists on their profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerSkill {
    #[serde(rename = "skillId")]
    pub skill_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "yearsOfExperience", default)]
    pub years_of_experience: u32,
}

/// Ordered experience tiers used by job postings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Expert,
}

impl ExperienceLevel {
    /// Derive a tier from years of experience (≤2 entry, ≤4 mid, else expert)
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=2 => ExperienceLevel::Entry,
            3..=4 => ExperienceLevel::Mid,
            _ => ExperienceLevel::Expert,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            ExperienceLevel::Entry => 0,
            ExperienceLevel::Mid => 1,
            ExperienceLevel::Expert => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "expert" => Ok(ExperienceLevel::Expert),
            other => Err(format!("unknown experience level: {}", other)),
        }
    }
}

/// Publication state of a job posting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    Draft,
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(JobStatus::Open),
            "closed" => Ok(JobStatus::Closed),
            "draft" => Ok(JobStatus::Draft),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// Job posting published by an employer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "experienceLevel")]
    pub experience_level: ExperienceLevel,
    #[serde(rename = "locationPreference")]
    pub location_preference: String,
    #[serde(rename = "projectType")]
    pub project_type: String,
    #[serde(rename = "hoursPerWeek")]
    pub hours_per_week: u32,
    #[serde(rename = "requiredLanguages", default)]
    pub required_languages: Option<Vec<String>>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl JobPosting {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }
}

/// A skill required by a job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSkill {
    #[serde(rename = "skillId")]
    pub skill_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "isStarred", default)]
    pub is_starred: bool,
}

/// A required skill the freelancer has
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSkill {
    #[serde(rename = "skillId")]
    pub skill_id: i64,
    pub name: String,
    #[serde(rename = "yearsOfExperience")]
    pub years_of_experience: u32,
    #[serde(rename = "isStarred")]
    pub is_starred: bool,
}

/// A required skill the freelancer lacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    #[serde(rename = "skillId")]
    pub skill_id: i64,
    pub name: String,
    #[serde(rename = "isStarred")]
    pub is_starred: bool,
}

/// Per-dimension sub-scores, each in the 0.0 - 1.0 range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub project_type: f64,
    pub working_hours: f64,
    pub languages: f64,
    pub keywords: f64,
}

/// Compatibility of one freelancer with one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32,
    #[serde(rename = "matchingSkills")]
    pub matching_skills: Vec<MatchingSkill>,
    #[serde(rename = "missingSkills")]
    pub missing_skills: Vec<MissingSkill>,
    #[serde(rename = "skillsMatchPercentage")]
    pub skills_match_percentage: u32,
    pub breakdown: ScoreBreakdown,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub project_type: f64,
    pub working_hours: f64,
    pub languages: f64,
    pub keywords: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.skills
            + self.experience
            + self.location
            + self.project_type
            + self.working_hours
            + self.languages
            + self.keywords
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.40,
            experience: 0.15,
            location: 0.10,
            project_type: 0.10,
            working_hours: 0.10,
            languages: 0.10,
            keywords: 0.05,
        }
    }
}

/// A job posting together with its required skills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCandidate {
    pub job: JobPosting,
    pub skills: Vec<JobSkill>,
}

/// A freelancer together with their listed skills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerCandidate {
    pub freelancer: FreelancerProfile,
    pub skills: Vec<FreelancerSkill>,
}

/// Job recommendation returned to a freelancer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecommendation {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub title: String,
    #[serde(rename = "projectType")]
    pub project_type: String,
    #[serde(rename = "locationPreference")]
    pub location_preference: String,
    #[serde(rename = "experienceLevel")]
    pub experience_level: ExperienceLevel,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

/// Freelancer ranked against a job for an employer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerRecommendation {
    #[serde(rename = "freelancerId")]
    pub freelancer_id: String,
    pub country: String,
    #[serde(rename = "yearsOfExperience")]
    pub years_of_experience: u32,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_from_years() {
        assert_eq!(ExperienceLevel::from_years(0), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(2), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(3), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::from_years(4), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::from_years(5), ExperienceLevel::Expert);
    }

    #[test]
    fn test_experience_level_parse() {
        assert_eq!("Expert".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Expert));
        assert!("senior".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_job_posting_deserializes_camel_case() {
        let job: JobPosting = serde_json::from_str(
            r#"{
                "id": "job_1",
                "title": "Rust engineer",
                "experienceLevel": "mid",
                "locationPreference": "Remote",
                "projectType": "long-term",
                "hoursPerWeek": 30,
                "createdAt": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(job.experience_level, ExperienceLevel::Mid);
        assert_eq!(job.status, JobStatus::Open);
        assert!(job.required_languages.is_none());
    }
}
