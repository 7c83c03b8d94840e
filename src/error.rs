use crate::network::NetworkError;
use crate::report::ReportError;
use crate::simulation::SimulationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<SimulationError> for AppError {
    fn from(err: SimulationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<NetworkError> for AppError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::UnknownMember(_) => AppError::NotFound(err.to_string()),
            NetworkError::TierNotHigher { .. } | NetworkError::Overflow { .. } => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberId;
    use crate::engine::EngineError;

    #[test]
    fn test_unknown_member_maps_to_not_found() {
        let err = AppError::from(NetworkError::UnknownMember(MemberId::new(7)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_simulation_error_maps_to_bad_request() {
        let err = AppError::from(SimulationError::Engine(EngineError::UnknownMember(
            MemberId::new(7),
        )));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
