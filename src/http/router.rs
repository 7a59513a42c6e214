//! Router configuration: routes plus tracing and CORS middleware.

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState, server: &ServerConfig) -> Result<Router> {
    let cors = cors_layer(server)?;

    let api = Router::new()
        .route("/flights", get(handlers::flights))
        .route("/popular-routes", get(handlers::popular_routes))
        .route("/speed-distribution", get(handlers::speed_distribution))
        .route("/high-demand-times", get(handlers::high_demand_times))
        .route("/price-trends", get(handlers::price_trends));

    Ok(Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// `"*"` anywhere in the list opens the API to every origin
fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if server.allows_any_origin() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = server
        .allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid allowed origin: {}", o)))
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(origins))
}
