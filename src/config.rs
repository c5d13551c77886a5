use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{Page, PaginationError};
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u32,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
    /// Open jobs loaded before scoring, and the batch size when paging
    /// through freelancers
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
}

impl MatchingSettings {
    /// Resolve a requested page, falling back to the default limit
    pub fn page(&self, page: u32, limit: Option<u32>) -> Result<Page, PaginationError> {
        Page::validated(page, limit.unwrap_or(self.default_limit), self.max_limit)
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            candidate_limit: default_candidate_limit(),
        }
    }
}

fn default_min_score() -> u32 { 50 }
fn default_limit() -> u32 { 10 }
fn default_max_limit() -> u32 { 100 }
fn default_candidate_limit() -> usize { 500 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_project_type_weight")]
    pub project_type: f64,
    #[serde(default = "default_working_hours_weight")]
    pub working_hours: f64,
    #[serde(default = "default_languages_weight")]
    pub languages: f64,
    #[serde(default = "default_keywords_weight")]
    pub keywords: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            location: default_location_weight(),
            project_type: default_project_type_weight(),
            working_hours: default_working_hours_weight(),
            languages: default_languages_weight(),
            keywords: default_keywords_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            skills: config.skills,
            experience: config.experience,
            location: config.location,
            project_type: config.project_type,
            working_hours: config.working_hours,
            languages: config.languages,
            keywords: config.keywords,
        }
    }
}

fn default_skills_weight() -> f64 { 0.40 }
fn default_experience_weight() -> f64 { 0.15 }
fn default_location_weight() -> f64 { 0.10 }
fn default_project_type_weight() -> f64 { 0.10 }
fn default_working_hours_weight() -> f64 { 0.10 }
fn default_languages_weight() -> f64 { 0.10 }
fn default_keywords_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FM__)
    /// 5. DATABASE_URL / REDIS_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FM__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Apply the conventional DATABASE_URL and REDIS_URL variables on top of
/// the layered configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}
