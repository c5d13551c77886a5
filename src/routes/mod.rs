// Route exports
pub mod recommendations;
pub mod scoring;

use actix_web::web;

pub use recommendations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure)
            .configure(scoring::configure),
    );
}
