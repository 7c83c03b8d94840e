use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::AppState;
use crate::error::AppError;
use crate::report::{payout_csv_string, payout_rows, PayoutRow};

/// Ledger of the most recent payout run.
pub async fn get_payouts(State(state): State<AppState>) -> Json<Vec<PayoutRow>> {
    let simulator = state.simulator.read().await;
    Json(payout_rows(simulator.network()))
}

/// Same rows as `get_payouts`, as a CSV download.
pub async fn export_payouts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let simulator = state.simulator.read().await;
    let body = payout_csv_string(&payout_rows(simulator.network()))?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], body))
}
