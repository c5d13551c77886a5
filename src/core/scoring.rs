use std::collections::HashMap;

use crate::models::{
    ExperienceLevel, FreelancerProfile, FreelancerSkill, JobPosting, JobSkill, MatchResult,
    MatchingSkill, MissingSkill, ScoreBreakdown, ScoringWeights,
};

/// Location preference that accepts freelancers from anywhere
pub const REMOTE_LOCATION: &str = "Remote";
/// Location preference for partially on-site work
pub const HYBRID_LOCATION: &str = "Hybrid";
/// Language assumed when a job lists none
pub const DEFAULT_LANGUAGE: &str = "English";

/// Years in a skill from which each matching skill earns a bonus
const SENIOR_SKILL_YEARS: u32 = 3;
const SENIOR_SKILL_BONUS: f64 = 0.10;
/// Share of the skills sub-score given to starred skills when any are starred
const STARRED_SHARE: f64 = 0.3;
/// Keyword hits needed for a full keyword sub-score
const KEYWORD_SATURATION: f64 = 3.0;
/// Excess weekly hours at which the working-hours sub-score reaches zero
const HOURS_TOLERANCE: f64 = 20.0;

/// Calculate the compatibility (0-100) of a freelancer with a job posting
///
/// Scoring formula:
/// score = round((
///     skills * 0.40 +          # required skills held, starred blend, seniority bonus
///     experience * 0.15 +      # derived tier vs required tier
///     location * 0.10 +        # remote or same country
///     project_type * 0.10 +    # job type among preferred types
///     working_hours * 0.10 +   # job hours within preferred hours
///     languages * 0.10 +       # required languages spoken
///     keywords * 0.05          # expertise keywords found in the posting
/// ) * 100)
///
/// Missing optional inputs fall back to neutral sub-scores, so this never fails.
pub fn calculate_match_score(
    freelancer: &FreelancerProfile,
    freelancer_skills: &[FreelancerSkill],
    job: &JobPosting,
    job_skills: &[JobSkill],
    weights: &ScoringWeights,
) -> MatchResult {
    // Duplicate skill rows keep the highest years of experience
    let mut held: HashMap<i64, &FreelancerSkill> = HashMap::with_capacity(freelancer_skills.len());
    for skill in freelancer_skills {
        held.entry(skill.skill_id)
            .and_modify(|existing| {
                if skill.years_of_experience > existing.years_of_experience {
                    *existing = skill;
                }
            })
            .or_insert(skill);
    }

    let mut matching_skills = Vec::new();
    let mut missing_skills = Vec::new();
    for required in job_skills {
        match held.get(&required.skill_id) {
            Some(skill) => matching_skills.push(MatchingSkill {
                skill_id: required.skill_id,
                name: display_name(&required.name, &skill.name),
                years_of_experience: skill.years_of_experience,
                is_starred: required.is_starred,
            }),
            None => missing_skills.push(MissingSkill {
                skill_id: required.skill_id,
                name: required.name.clone(),
                is_starred: required.is_starred,
            }),
        }
    }

    let max_years = freelancer_skills
        .iter()
        .map(|s| s.years_of_experience)
        .max()
        .unwrap_or(0);

    let breakdown = ScoreBreakdown {
        skills: calculate_skills_score(job_skills, &matching_skills),
        experience: calculate_experience_score(
            ExperienceLevel::from_years(max_years),
            job.experience_level,
        ),
        location: calculate_location_score(&job.location_preference, &freelancer.country),
        project_type: calculate_project_type_score(
            freelancer.preferred_project_types.as_deref(),
            &job.project_type,
        ),
        working_hours: calculate_hours_score(job.hours_per_week, freelancer.preferred_hours()),
        languages: calculate_language_score(
            job.required_languages.as_deref(),
            freelancer.languages.as_deref(),
        ),
        keywords: calculate_keyword_score(
            freelancer.expertise_keywords.as_deref(),
            &job.title,
            &job.description,
        ),
    };

    let total = breakdown.skills * weights.skills
        + breakdown.experience * weights.experience
        + breakdown.location * weights.location
        + breakdown.project_type * weights.project_type
        + breakdown.working_hours * weights.working_hours
        + breakdown.languages * weights.languages
        + breakdown.keywords * weights.keywords;

    let skills_match_percentage = if job_skills.is_empty() {
        100
    } else {
        (matching_skills.len() as f64 / job_skills.len() as f64 * 100.0).round() as u32
    };

    MatchResult {
        score: (total * 100.0).round().max(0.0) as u32,
        matching_skills,
        missing_skills,
        skills_match_percentage,
        breakdown,
    }
}

fn display_name(required: &str, held: &str) -> String {
    if required.is_empty() {
        held.to_string()
    } else {
        required.to_string()
    }
}

/// Calculate skills score (0-1)
/// Share of required skills held, blended with starred coverage, plus a
/// bonus per senior skill. Capped at 1.0 before weighting.
#[inline]
fn calculate_skills_score(job_skills: &[JobSkill], matching: &[MatchingSkill]) -> f64 {
    let base = if job_skills.is_empty() {
        1.0
    } else {
        matching.len() as f64 / job_skills.len() as f64
    };

    let starred_required = job_skills.iter().filter(|s| s.is_starred).count();
    let mut score = if starred_required > 0 {
        let starred_matched = matching.iter().filter(|s| s.is_starred).count();
        let starred_ratio = starred_matched as f64 / starred_required as f64;
        base * (1.0 - STARRED_SHARE) + starred_ratio * STARRED_SHARE
    } else {
        base
    };

    let senior = matching
        .iter()
        .filter(|s| s.years_of_experience >= SENIOR_SKILL_YEARS)
        .count();
    score += senior as f64 * SENIOR_SKILL_BONUS;

    score.min(1.0)
}

/// Calculate experience score (0-1)
/// Full credit at or above the required tier, minus half per missing tier
#[inline]
fn calculate_experience_score(freelancer: ExperienceLevel, required: ExperienceLevel) -> f64 {
    if freelancer.index() >= required.index() {
        return 1.0;
    }

    let gap = (required.index() - freelancer.index()) as f64;
    (1.0 - 0.5 * gap).max(0.0)
}

/// Calculate location score (0-1)
#[inline]
fn calculate_location_score(job_location: &str, freelancer_country: &str) -> f64 {
    if job_location == REMOTE_LOCATION {
        1.0
    } else if job_location == freelancer_country {
        1.0
    } else if job_location == HYBRID_LOCATION && job_location == freelancer_country {
        // Never taken: an equal country already scored above
        0.8
    } else {
        0.2
    }
}

/// Calculate project type score (0-1)
#[inline]
fn calculate_project_type_score(preferred: Option<&[String]>, project_type: &str) -> f64 {
    match preferred {
        Some(types) if types.iter().any(|t| t == project_type) => 1.0,
        Some(_) => 0.3,
        None => 0.5,
    }
}

/// Calculate working hours score (0-1)
/// Linear decay over the hours the job asks beyond the preference
#[inline]
fn calculate_hours_score(job_hours: u32, preferred_hours: u32) -> f64 {
    if job_hours <= preferred_hours {
        return 1.0;
    }

    let excess = (job_hours - preferred_hours) as f64;
    (1.0 - excess / HOURS_TOLERANCE).max(0.0)
}

/// Calculate language score (0-1)
#[inline]
fn calculate_language_score(required: Option<&[String]>, spoken: Option<&[String]>) -> f64 {
    let default_required = [DEFAULT_LANGUAGE.to_string()];
    let required = required.unwrap_or(&default_required);

    if required.is_empty() {
        return 1.0;
    }

    let Some(spoken) = spoken else {
        return 0.5;
    };

    let covered = required.iter().filter(|lang| spoken.contains(lang)).count();
    covered as f64 / required.len() as f64
}

/// Calculate keyword score (0-1)
/// Counts expertise keywords appearing anywhere in the job title or description
#[inline]
fn calculate_keyword_score(keywords: Option<&[String]>, title: &str, description: &str) -> f64 {
    let keywords = match keywords {
        Some(k) if !k.is_empty() => k,
        _ => return 0.3,
    };

    let text = format!("{} {}", title, description).to_lowercase();
    let hits = keywords
        .iter()
        .filter(|k| text.contains(&k.to_lowercase()))
        .count();

    if hits == 0 {
        0.2
    } else {
        (hits as f64 / KEYWORD_SATURATION).min(1.0)
    }
}

/// Match scorer carrying the configured dimension weights
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one freelancer against one job
    pub fn score(
        &self,
        freelancer: &FreelancerProfile,
        freelancer_skills: &[FreelancerSkill],
        job: &JobPosting,
        job_skills: &[JobSkill],
    ) -> MatchResult {
        calculate_match_score(freelancer, freelancer_skills, job, job_skills, &self.weights)
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;
    use chrono::Utc;

    fn freelancer_skill(skill_id: i64, years: u32) -> FreelancerSkill {
        FreelancerSkill {
            skill_id,
            name: format!("skill-{}", skill_id),
            years_of_experience: years,
        }
    }

    fn job_skill(skill_id: i64, is_starred: bool) -> JobSkill {
        JobSkill {
            skill_id,
            name: format!("skill-{}", skill_id),
            is_starred,
        }
    }

    fn create_test_freelancer() -> FreelancerProfile {
        FreelancerProfile {
            id: "fl_1".to_string(),
            bio: "Backend developer".to_string(),
            years_of_experience: 5,
            preferred_project_types: Some(vec!["long-term".to_string()]),
            country: "Germany".to_string(),
            hours_per_week: Some(40),
            languages: Some(vec!["English".to_string(), "German".to_string()]),
            expertise_keywords: Some(vec!["rust".to_string()]),
        }
    }

    fn create_test_job() -> JobPosting {
        JobPosting {
            id: "job_1".to_string(),
            title: "Senior Rust engineer".to_string(),
            description: "Build a matching service".to_string(),
            experience_level: ExperienceLevel::Mid,
            location_preference: "Remote".to_string(),
            project_type: "long-term".to_string(),
            hours_per_week: 30,
            required_languages: None,
            status: JobStatus::Open,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_calculate_match_score() {
        let freelancer = create_test_freelancer();
        let job = create_test_job();
        let result = calculate_match_score(
            &freelancer,
            &[freelancer_skill(1, 5)],
            &job,
            &[job_skill(1, true)],
            &ScoringWeights::default(),
        );

        assert!(result.score >= 95 && result.score <= 100, "got {}", result.score);
        assert_eq!(result.matching_skills.len(), 1);
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.skills_match_percentage, 100);
    }

    #[test]
    fn test_skills_score_no_requirements() {
        assert_eq!(calculate_skills_score(&[], &[]), 1.0);
    }

    #[test]
    fn test_skills_score_starred_blend() {
        let required = vec![job_skill(1, true), job_skill(2, false)];
        let matching = vec![MatchingSkill {
            skill_id: 2,
            name: "skill-2".to_string(),
            years_of_experience: 1,
            is_starred: false,
        }];

        // base 0.5, starred ratio 0.0
        let score = calculate_skills_score(&required, &matching);
        assert!((score - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_skills_score_bonus_capped() {
        let required: Vec<JobSkill> = (1..=5).map(|id| job_skill(id, false)).collect();
        let matching: Vec<MatchingSkill> = (1..=5)
            .map(|id| MatchingSkill {
                skill_id: id,
                name: String::new(),
                years_of_experience: 10,
                is_starred: false,
            })
            .collect();

        assert_eq!(calculate_skills_score(&required, &matching), 1.0);
    }

    #[test]
    fn test_experience_score() {
        assert_eq!(calculate_experience_score(ExperienceLevel::Expert, ExperienceLevel::Entry), 1.0);
        assert_eq!(calculate_experience_score(ExperienceLevel::Mid, ExperienceLevel::Mid), 1.0);
        assert_eq!(calculate_experience_score(ExperienceLevel::Mid, ExperienceLevel::Expert), 0.5);
        assert_eq!(calculate_experience_score(ExperienceLevel::Entry, ExperienceLevel::Expert), 0.0);
    }

    #[test]
    fn test_location_score() {
        assert_eq!(calculate_location_score("Remote", "Germany"), 1.0);
        assert_eq!(calculate_location_score("Germany", "Germany"), 1.0);
        assert_eq!(calculate_location_score("Hybrid", "Germany"), 0.2);
        assert_eq!(calculate_location_score("France", "Germany"), 0.2);
        // A country literally named "Hybrid" takes the equality branch first
        assert_eq!(calculate_location_score("Hybrid", "Hybrid"), 1.0);
    }

    #[test]
    fn test_project_type_score() {
        let prefs = vec!["long-term".to_string()];
        assert_eq!(calculate_project_type_score(Some(&prefs), "long-term"), 1.0);
        assert_eq!(calculate_project_type_score(Some(&prefs), "one-off"), 0.3);
        assert_eq!(calculate_project_type_score(Some(&[]), "one-off"), 0.3);
        assert_eq!(calculate_project_type_score(None, "one-off"), 0.5);
    }

    #[test]
    fn test_hours_score() {
        assert_eq!(calculate_hours_score(30, 40), 1.0);
        assert_eq!(calculate_hours_score(40, 40), 1.0);
        assert!((calculate_hours_score(50, 40) - 0.5).abs() < 1e-9);
        assert_eq!(calculate_hours_score(80, 40), 0.0);
    }

    #[test]
    fn test_language_score() {
        let english = vec!["English".to_string()];
        let both = vec!["English".to_string(), "German".to_string()];

        assert_eq!(calculate_language_score(None, Some(&english)), 1.0);
        assert_eq!(calculate_language_score(None, None), 0.5);
        assert_eq!(calculate_language_score(Some(&[]), None), 1.0);
        assert_eq!(calculate_language_score(Some(&both), Some(&english)), 0.5);
        assert_eq!(calculate_language_score(None, Some(&[])), 0.0);
    }

    #[test]
    fn test_keyword_score() {
        let keywords = vec!["RUST".to_string(), "postgres".to_string(), "kafka".to_string()];

        assert_eq!(calculate_keyword_score(None, "t", "d"), 0.3);
        assert_eq!(calculate_keyword_score(Some(&[]), "t", "d"), 0.3);
        assert_eq!(calculate_keyword_score(Some(&keywords), "Go developer", "gRPC"), 0.2);
        assert_eq!(
            calculate_keyword_score(Some(&keywords), "Rust developer", "Postgres and Kafka"),
            1.0
        );
        let one = calculate_keyword_score(Some(&keywords), "Rust developer", "");
        assert!((one - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_scorer_is_deterministic() {
        let scorer = MatchScorer::default();
        let freelancer = create_test_freelancer();
        let job = create_test_job();
        let fskills = vec![freelancer_skill(1, 2), freelancer_skill(2, 4)];
        let jskills = vec![job_skill(1, true), job_skill(3, false)];

        let first = scorer.score(&freelancer, &fskills, &job, &jskills);
        let second = scorer.score(&freelancer, &fskills, &job, &jskills);

        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_freelancer_skill_keeps_most_years() {
        let freelancer = create_test_freelancer();
        let job = create_test_job();
        let result = calculate_match_score(
            &freelancer,
            &[freelancer_skill(1, 1), freelancer_skill(1, 6)],
            &job,
            &[job_skill(1, false)],
            &ScoringWeights::default(),
        );

        assert_eq!(result.matching_skills[0].years_of_experience, 6);
    }
}
