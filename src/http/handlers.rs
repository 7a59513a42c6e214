//! Endpoint handlers. Each one fetches a fresh snapshot (price trends excepted)
//! and applies exactly one view.

use axum::{extract::State, Json};
use tracing::debug;

use super::state::AppState;
use crate::data::types::Snapshot;
use crate::views::{
    self,
    types::{FlightPosition, HourlyDemand, PriceQuote, RouteCount, SpeedBin},
};

async fn fetch(state: &AppState, endpoint: &str) -> Snapshot {
    let outcome = state.source.fetch_snapshot().await;
    debug!(
        "{}: {} rows (fetch status {:?})",
        endpoint,
        outcome.snapshot.len(),
        outcome.status
    );
    outcome.snapshot
}

/// GET /api/flights
pub async fn flights(State(state): State<AppState>) -> Json<Vec<FlightPosition>> {
    let snapshot = fetch(&state, "flights").await;
    Json(views::flight_positions(&snapshot))
}

/// GET /api/popular-routes
pub async fn popular_routes(State(state): State<AppState>) -> Json<Vec<RouteCount>> {
    let snapshot = fetch(&state, "popular-routes").await;
    Json(views::popular_routes(&snapshot))
}

/// GET /api/speed-distribution
pub async fn speed_distribution(State(state): State<AppState>) -> Json<Vec<SpeedBin>> {
    let snapshot = fetch(&state, "speed-distribution").await;
    Json(views::speed_distribution(&snapshot))
}

/// GET /api/high-demand-times
pub async fn high_demand_times(State(state): State<AppState>) -> Json<Vec<HourlyDemand>> {
    let snapshot = fetch(&state, "high-demand-times").await;
    Json(views::high_demand_times(&snapshot))
}

/// GET /api/price-trends
pub async fn price_trends() -> Json<Vec<PriceQuote>> {
    Json(views::price_trends(&mut rand::thread_rng()))
}
