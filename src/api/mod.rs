pub mod health;
pub mod leaderboard;
pub mod members;
pub mod payouts;
pub mod periods;
pub mod stats;

use crate::simulation::Simulator;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

/// Shared handler state.
///
/// Period runs hold the write lock for their whole duration, so no reader
/// ever observes a half-applied period.
#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<RwLock<Simulator>>,
    pub export_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(simulator: Simulator, export_dir: Option<PathBuf>) -> Self {
        Self {
            simulator: Arc::new(RwLock::new(simulator)),
            export_dir,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/periods", post(periods::run_period))
        .route("/v1/history", get(periods::get_history))
        .route("/v1/members/:id", get(members::get_member))
        .route("/v1/leaderboard", get(leaderboard::get_leaderboard))
        .route("/v1/stats", get(stats::get_stats))
        .route("/v1/payouts", get(payouts::get_payouts))
        .route("/v1/payouts/export", get(payouts::export_payouts))
        .layer(cors)
        .with_state(state)
}
