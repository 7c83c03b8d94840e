use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::report::NetworkStats;

pub async fn get_stats(State(state): State<AppState>) -> Json<NetworkStats> {
    let simulator = state.simulator.read().await;
    Json(NetworkStats::collect(simulator.network()))
}
