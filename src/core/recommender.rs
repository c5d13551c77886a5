use serde::{Deserialize, Serialize};

use crate::core::{
    filters::{is_recommendable, meets_threshold, DEFAULT_MIN_SCORE},
    pagination::Page,
    scoring::MatchScorer,
};
use crate::models::{
    FreelancerCandidate, FreelancerProfile, FreelancerRecommendation, FreelancerSkill,
    JobCandidate, JobPosting, JobRecommendation, JobSkill, ScoringWeights,
};

/// One page of ranked results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPage<T> {
    pub items: Vec<T>,
    /// Results above the threshold before pagination
    pub total_results: usize,
    pub total_candidates: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl<T> RecommendationPage<T> {
    fn paginate(ranked: Vec<T>, total_candidates: usize, page: Page) -> Self {
        let total_results = ranked.len();
        let items = page.apply(ranked);
        let has_more = page.offset() + items.len() < total_results;

        Self {
            items,
            total_results,
            total_candidates,
            page: page.page,
            limit: page.limit,
            has_more,
        }
    }
}

/// Recommendation orchestrator - scores candidates and ranks them
///
/// # Pipeline Stages
/// 1. Drop candidates that cannot be recommended (closed or draft jobs)
/// 2. Score each remaining pair
/// 3. Keep scores at or above the threshold
/// 4. Sort and paginate
#[derive(Debug, Clone, Copy)]
pub struct Recommender {
    scorer: MatchScorer,
    min_score: u32,
}

impl Recommender {
    pub fn new(weights: ScoringWeights, min_score: u32) -> Self {
        Self {
            scorer: MatchScorer::new(weights),
            min_score,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_MIN_SCORE)
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    /// Rank open jobs for a freelancer
    ///
    /// Sorted by score (descending), newer postings first on ties.
    /// `min_score` overrides the configured threshold for this call.
    pub fn recommend_jobs(
        &self,
        freelancer: &FreelancerProfile,
        freelancer_skills: &[FreelancerSkill],
        candidates: Vec<JobCandidate>,
        min_score: Option<u32>,
        page: Page,
    ) -> RecommendationPage<JobRecommendation> {
        let total_candidates = candidates.len();
        let threshold = min_score.unwrap_or(self.min_score);

        let mut ranked: Vec<JobRecommendation> = candidates
            .into_iter()
            .filter(|candidate| is_recommendable(&candidate.job))
            .filter_map(|JobCandidate { job, skills }| {
                let result = self
                    .scorer
                    .score(freelancer, freelancer_skills, &job, &skills);

                if meets_threshold(&result, threshold) {
                    Some(JobRecommendation {
                        job_id: job.id,
                        title: job.title,
                        project_type: job.project_type,
                        location_preference: job.location_preference,
                        experience_level: job.experience_level,
                        created_at: job.created_at,
                        match_result: result,
                    })
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.match_result
                .score
                .cmp(&a.match_result.score)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        tracing::debug!(
            "Ranked {} of {} jobs for freelancer {} (threshold {})",
            ranked.len(),
            total_candidates,
            freelancer.id,
            threshold
        );

        RecommendationPage::paginate(ranked, total_candidates, page)
    }

    /// Rank freelancers for a job
    ///
    /// Sorted by score (descending), then by freelancer id for a stable order.
    pub fn rank_freelancers(
        &self,
        job: &JobPosting,
        job_skills: &[JobSkill],
        candidates: Vec<FreelancerCandidate>,
        min_score: Option<u32>,
        page: Page,
    ) -> RecommendationPage<FreelancerRecommendation> {
        let total_candidates = candidates.len();
        let threshold = min_score.unwrap_or(self.min_score);

        let mut ranked: Vec<FreelancerRecommendation> = candidates
            .into_iter()
            .filter_map(|FreelancerCandidate { freelancer, skills }| {
                let result = self.scorer.score(&freelancer, &skills, job, job_skills);

                meets_threshold(&result, threshold).then(|| FreelancerRecommendation {
                    freelancer_id: freelancer.id,
                    country: freelancer.country,
                    years_of_experience: freelancer.years_of_experience,
                    match_result: result,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.match_result
                .score
                .cmp(&a.match_result.score)
                .then_with(|| a.freelancer_id.cmp(&b.freelancer_id))
        });

        tracing::debug!(
            "Ranked {} of {} freelancers for job {} (threshold {})",
            ranked.len(),
            total_candidates,
            job.id,
            threshold
        );

        RecommendationPage::paginate(ranked, total_candidates, page)
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
