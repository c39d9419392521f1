use aura_core::search::SearchError;
use aura_core::CoreError;
use aura_order::BookingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const TOP_UP_HINT: &str = "Add credits to your account and try again";
const BOOKING_FAILED: &str = "Booking failed. Please try again.";

#[derive(Debug)]
pub enum AppError {
    Authentication(String),
    Forbidden(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    InsufficientCredits { required: u64, available: u64 },
    /// Upstream search API rejected or failed the call
    Upstream(String),
    /// A required collaborator is not configured
    Unavailable(String),
    Internal(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InsufficientCredits { required, available } => {
                let body = Json(json!({
                    "error": format!(
                        "Insufficient credits. You need {} credits but only have {}.",
                        required, available
                    ),
                    "required": required,
                    "available": available,
                    "remediation": TOP_UP_HINT,
                }));
                return (StatusCode::PAYMENT_REQUIRED, body).into_response();
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NotConfigured(msg) => AppError::Unavailable(msg),
            SearchError::Authentication(msg) | SearchError::Upstream(msg) => AppError::Upstream(msg),
            SearchError::InvalidResponse(msg) => {
                tracing::error!("Malformed search response: {}", msg);
                AppError::Upstream("Failed to search flights".to_string())
            }
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InsufficientCredits { required, available } => {
                AppError::InsufficientCredits { required, available }
            }
            BookingError::InProgress => AppError::Conflict(err.to_string()),
            BookingError::InvalidAmount(msg) => AppError::Validation(msg),
            BookingError::InvalidPrice(_) => AppError::Validation(err.to_string()),
            BookingError::NotOwner(_) => AppError::Forbidden("Booking belongs to another user".to_string()),
            BookingError::Storage(msg) => {
                tracing::error!("Booking storage failure: {}", msg);
                AppError::Internal(BOOKING_FAILED.to_string())
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IdentityError(msg) => AppError::Authentication(msg),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
