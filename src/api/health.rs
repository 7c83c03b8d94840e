use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the network holds its root; also reports where the run is.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let simulator = state.simulator.read().await;
    let network = simulator.network();
    let status = if network.root().is_some() {
        "ready"
    } else {
        "empty"
    };

    Json(serde_json::json!({
        "status": status,
        "members": network.len(),
        "nextPeriod": simulator.next_period(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tier;
    use crate::engine::RuleTable;
    use crate::simulation::{PeriodInput, Simulator};

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_network_state() {
        let mut simulator =
            Simulator::new(RuleTable::reference(), "root", Tier::new(500)).unwrap();
        simulator.run_period(&PeriodInput::default()).unwrap();
        let state = AppState::new(simulator, None);

        let Json(body) = ready(State(state)).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["members"], 1);
        assert_eq!(body["nextPeriod"], 2);
    }
}
