use axum::extract::State;
use axum::Json;
use std::path::Path;

use crate::api::AppState;
use crate::domain::PeriodSummary;
use crate::error::AppError;
use crate::network::Network;
use crate::report::{export_payout_csv, payout_rows};
use crate::simulation::PeriodInput;

/// Apply one period and return its summary.
///
/// The run walks every member's capped subtree, so it happens on the
/// blocking pool while the write guard is held. Once `run_period` succeeds
/// the period is committed; a failing CSV export is logged and does not
/// turn the response into an error, so clients never retry an applied
/// period.
pub async fn run_period(
    State(state): State<AppState>,
    Json(input): Json<PeriodInput>,
) -> Result<Json<PeriodSummary>, AppError> {
    let mut simulator = state.simulator.clone().write_owned().await;
    let export_dir = state.export_dir.clone();

    let summary = tokio::task::spawn_blocking(move || {
        let summary = simulator.run_period(&input)?;
        if let Some(dir) = export_dir {
            export_period(simulator.network(), &dir, summary.period);
        }
        Ok::<_, AppError>(summary)
    })
    .await
    .map_err(|e| AppError::Internal(format!("period run aborted: {}", e)))??;

    Ok(Json(summary))
}

fn export_period(network: &Network, dir: &Path, period: u32) {
    let path = dir.join(format!("period-{}.csv", period));
    if let Err(e) = export_payout_csv(&payout_rows(network), &path) {
        tracing::error!(
            period,
            path = %path.display(),
            error = %e,
            "payout export failed; period is committed"
        );
    }
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<PeriodSummary>> {
    let simulator = state.simulator.read().await;
    Json(simulator.network().history().to_vec())
}
