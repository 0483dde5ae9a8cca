pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use actix_cors::Cors;
use actix_web::http::header;

use crate::config::CorsConfig;

/// Allows the configured frontend and the local dev server, nothing else.
pub fn cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600);

    for origin in [&config.frontend_origin, &config.dev_origin] {
        if !origin.trim().is_empty() {
            cors = cors.allowed_origin(origin.trim());
        }
    }
    cors
}
