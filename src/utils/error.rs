use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Already redeemed: {0}")]
    AlreadyRedeemed(String),

    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    #[error("Upstream ledger error: {0}")]
    Upstream(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::AlreadyRedeemed(_) => StatusCode::CONFLICT,
            AppError::SimulationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::AlreadyRedeemed(_) => "ALREADY_REDEEMED",
            AppError::SimulationFailed(_) => "SIMULATION_FAILED",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidState(msg)
            | AppError::AlreadyRedeemed(msg)
            | AppError::SimulationFailed(msg)
            | AppError::Upstream(msg)
            | AppError::Internal(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level messages to the client. Simulation logs are
        // client-relevant diagnostics; database and upstream details are not.
        let public_message = match &self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidState(msg)
            | AppError::AlreadyRedeemed(msg)
            | AppError::SimulationFailed(msg) => msg.clone(),
            AppError::Upstream(_) => "The ledger is temporarily unavailable".to_string(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidState("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::AlreadyRedeemed("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::SimulationFailed("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(AppError::InvalidState("x".into()).code(), "INVALID_STATE");
        assert_eq!(
            AppError::AlreadyRedeemed("x".into()).code(),
            "ALREADY_REDEEMED"
        );
    }
}
