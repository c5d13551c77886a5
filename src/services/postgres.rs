use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    ExperienceLevel, FreelancerCandidate, FreelancerProfile, FreelancerSkill, JobCandidate,
    JobPosting, JobSkill, JobStatus,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL client for marketplace freelancer and job rows
///
/// The marketplace web application owns these tables; this client only
/// reads them to feed the scorer.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch a freelancer profile by id
    pub async fn get_freelancer(&self, freelancer_id: &str) -> Result<FreelancerProfile, PostgresError> {
        let query = r#"
            SELECT id, bio, years_of_experience, preferred_project_types, country,
                   hours_per_week, languages, expertise_keywords
            FROM freelancers
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(freelancer_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("freelancer {}", freelancer_id)))?;

        freelancer_from_row(&row)
    }

    /// Fetch the skills listed on a freelancer profile
    pub async fn get_freelancer_skills(
        &self,
        freelancer_id: &str,
    ) -> Result<Vec<FreelancerSkill>, PostgresError> {
        let query = r#"
            SELECT fs.freelancer_id, fs.skill_id, s.name, fs.years_of_experience
            FROM freelancer_skills fs
            JOIN skills s ON s.id = fs.skill_id
            WHERE fs.freelancer_id = $1
            ORDER BY fs.skill_id
        "#;

        let rows = sqlx::query(query)
            .bind(freelancer_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(freelancer_skill_from_row).collect()
    }

    /// Fetch a job posting by id
    pub async fn get_job(&self, job_id: &str) -> Result<JobPosting, PostgresError> {
        let query = r#"
            SELECT id, title, description, experience_level, location_preference,
                   project_type, hours_per_week, required_languages, status, created_at
            FROM jobs
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("job {}", job_id)))?;

        job_from_row(&row)
    }

    /// Fetch the skills a job requires
    pub async fn get_job_skills(&self, job_id: &str) -> Result<Vec<JobSkill>, PostgresError> {
        let query = r#"
            SELECT js.job_id, js.skill_id, s.name, js.is_starred
            FROM job_skills js
            JOIN skills s ON s.id = js.skill_id
            WHERE js.job_id = $1
            ORDER BY js.skill_id
        "#;

        let rows = sqlx::query(query).bind(job_id).fetch_all(&self.pool).await?;

        rows.iter().map(job_skill_from_row).collect()
    }

    /// List open jobs, newest first, with their required skills attached
    pub async fn list_open_jobs(&self, limit: usize) -> Result<Vec<JobCandidate>, PostgresError> {
        let query = r#"
            SELECT id, title, description, experience_level, location_preference,
                   project_type, hours_per_week, required_languages, status, created_at
            FROM jobs
            WHERE status = 'open'
            ORDER BY created_at DESC
            LIMIT $1
        "#;

        let rows = sqlx::query(query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let jobs = rows
            .iter()
            .map(job_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<String> = jobs.iter().map(|j| j.id.clone()).collect();
        let skills_query = r#"
            SELECT js.job_id, js.skill_id, s.name, js.is_starred
            FROM job_skills js
            JOIN skills s ON s.id = js.skill_id
            WHERE js.job_id = ANY($1)
            ORDER BY js.skill_id
        "#;

        let skill_rows = sqlx::query(skills_query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let mut skills_by_job: HashMap<String, Vec<JobSkill>> = HashMap::new();
        for row in &skill_rows {
            let job_id: String = row.try_get("job_id")?;
            skills_by_job
                .entry(job_id)
                .or_default()
                .push(job_skill_from_row(row)?);
        }

        tracing::debug!("Loaded {} open jobs", jobs.len());

        Ok(jobs
            .into_iter()
            .map(|job| {
                let skills = skills_by_job.remove(&job.id).unwrap_or_default();
                JobCandidate { job, skills }
            })
            .collect())
    }

    /// List every freelancer with their skills attached
    ///
    /// Walks the table in `id` order, `batch_size` rows at a time, so the
    /// whole pool is ranked without one unbounded query.
    pub async fn list_freelancers(
        &self,
        batch_size: usize,
    ) -> Result<Vec<FreelancerCandidate>, PostgresError> {
        let query = r#"
            SELECT id, bio, years_of_experience, preferred_project_types, country,
                   hours_per_week, languages, expertise_keywords
            FROM freelancers
            WHERE $1::text IS NULL OR id > $1
            ORDER BY id
            LIMIT $2
        "#;

        let batch_size = batch_size.max(1);
        let mut candidates = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let rows = sqlx::query(query)
                .bind(&after)
                .bind(batch_size as i64)
                .fetch_all(&self.pool)
                .await?;

            let batch = rows
                .iter()
                .map(freelancer_from_row)
                .collect::<Result<Vec<_>, _>>()?;

            after = next_cursor(&batch, batch_size);
            candidates.extend(self.attach_freelancer_skills(batch).await?);

            if after.is_none() {
                break;
            }
        }

        tracing::debug!("Loaded {} freelancers", candidates.len());

        Ok(candidates)
    }

    async fn attach_freelancer_skills(
        &self,
        freelancers: Vec<FreelancerProfile>,
    ) -> Result<Vec<FreelancerCandidate>, PostgresError> {
        if freelancers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = freelancers.iter().map(|f| f.id.clone()).collect();
        let skills_query = r#"
            SELECT fs.freelancer_id, fs.skill_id, s.name, fs.years_of_experience
            FROM freelancer_skills fs
            JOIN skills s ON s.id = fs.skill_id
            WHERE fs.freelancer_id = ANY($1)
            ORDER BY fs.skill_id
        "#;

        let skill_rows = sqlx::query(skills_query)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let mut skills_by_freelancer: HashMap<String, Vec<FreelancerSkill>> = HashMap::new();
        for row in &skill_rows {
            let freelancer_id: String = row.try_get("freelancer_id")?;
            skills_by_freelancer
                .entry(freelancer_id)
                .or_default()
                .push(freelancer_skill_from_row(row)?);
        }

        Ok(freelancers
            .into_iter()
            .map(|freelancer| {
                let skills = skills_by_freelancer.remove(&freelancer.id).unwrap_or_default();
                FreelancerCandidate { freelancer, skills }
            })
            .collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn freelancer_from_row(row: &PgRow) -> Result<FreelancerProfile, PostgresError> {
    let years: i32 = row.try_get("years_of_experience")?;
    let hours: Option<i32> = row.try_get("hours_per_week")?;

    Ok(FreelancerProfile {
        id: row.try_get("id")?,
        bio: row.try_get::<Option<String>, _>("bio")?.unwrap_or_default(),
        years_of_experience: non_negative(years),
        preferred_project_types: row.try_get("preferred_project_types")?,
        country: row.try_get::<Option<String>, _>("country")?.unwrap_or_default(),
        hours_per_week: hours.map(non_negative),
        languages: row.try_get("languages")?,
        expertise_keywords: row.try_get("expertise_keywords")?,
    })
}

fn job_from_row(row: &PgRow) -> Result<JobPosting, PostgresError> {
    let level: String = row.try_get("experience_level")?;
    let status: String = row.try_get("status")?;
    let hours: i32 = row.try_get("hours_per_week")?;

    Ok(JobPosting {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get::<Option<String>, _>("description")?.unwrap_or_default(),
        experience_level: level
            .parse::<ExperienceLevel>()
            .map_err(PostgresError::InvalidInput)?,
        location_preference: row.try_get("location_preference")?,
        project_type: row.try_get("project_type")?,
        hours_per_week: non_negative(hours),
        required_languages: row.try_get("required_languages")?,
        status: status.parse::<JobStatus>().map_err(PostgresError::InvalidInput)?,
        created_at: row.try_get("created_at")?,
    })
}

fn freelancer_skill_from_row(row: &PgRow) -> Result<FreelancerSkill, PostgresError> {
    let years: i32 = row.try_get("years_of_experience")?;
    Ok(FreelancerSkill {
        skill_id: row.try_get("skill_id")?,
        name: row.try_get("name")?,
        years_of_experience: non_negative(years),
    })
}

fn job_skill_from_row(row: &PgRow) -> Result<JobSkill, PostgresError> {
    Ok(JobSkill {
        skill_id: row.try_get("skill_id")?,
        name: row.try_get("name")?,
        is_starred: row.try_get("is_starred")?,
    })
}

/// Id to resume after, or `None` once a short batch shows the table is exhausted
fn next_cursor(batch: &[FreelancerProfile], batch_size: usize) -> Option<String> {
    if batch.len() < batch_size {
        return None;
    }
    batch.last().map(|freelancer| freelancer.id.clone())
}

#[inline]
fn non_negative(value: i32) -> u32 {
    value.max(0) as u32
}
