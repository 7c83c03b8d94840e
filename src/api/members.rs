use axum::extract::{Path, State};
use axum::Json;

use crate::api::AppState;
use crate::domain::MemberId;
use crate::error::AppError;
use crate::report::MemberSummary;

pub async fn get_member(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MemberSummary>, AppError> {
    let id = id
        .parse::<MemberId>()
        .map_err(|_| AppError::BadRequest(format!("invalid member id {:?}", id)))?;

    let simulator = state.simulator.read().await;
    let summary = MemberSummary::build(simulator.network(), id)?;
    Ok(Json(summary))
}
