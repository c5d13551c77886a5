use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use freelance_match::config::{LoggingSettings, Settings};
use freelance_match::routes::{self, AppState};
use freelance_match::services::{CacheManager, PostgresClient};
use freelance_match::error::{handle_json_payload_error, handle_query_payload_error};
use freelance_match::Recommender;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; RUST_LOG takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::other(e)
    })?;

    init_logging(&settings.logging);

    info!("Starting Freelance Match service...");

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to connect to Redis: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let store = match PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let weights = settings.scoring_weights();
    if (weights.sum() - 1.0).abs() > 1e-6 {
        tracing::warn!("Scoring weights sum to {:.3}, scores may exceed 100", weights.sum());
    }

    let recommender = Recommender::new(weights, settings.matching.min_score);

    info!(
        "Recommender initialized with weights: {:?}, min score: {}",
        weights,
        recommender.min_score()
    );

    let scorer = web::Data::new(*recommender.scorer());
    let app_state = web::Data::new(AppState {
        store,
        cache,
        recommender,
        matching: settings.matching.clone(),
    });

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(scorer.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
