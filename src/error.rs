//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Pricing(e) => match e {
                PricingError::OccupancyExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PricingError::InvalidGuestCount { .. }
                | PricingError::InvalidDate { .. }
                | PricingError::InvalidResource { .. }
                | PricingError::AmountOverflow => StatusCode::BAD_REQUEST,
                PricingError::SkuNotFound { .. } => StatusCode::NOT_FOUND,
                PricingError::SkuInactive { .. } | PricingError::SlotUnavailable { .. } => {
                    StatusCode::CONFLICT
                }
            },
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Conflict(_) => "conflict",
            AppError::Pricing(e) => e.error_type(),
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Never leak store or internal details to clients
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let details = match &self {
            AppError::Pricing(e) => e.details(),
            _ => None,
        };

        let body = PricingErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = AppError::from(PricingError::OccupancyExceeded {
            max_guests: 6,
            requested: 7,
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_type(), "occupancy_exceeded");

        let err = AppError::from(PricingError::SlotUnavailable {
            sku_code: "PR01-L".to_string(),
            date: "2025-03-15".to_string(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = AppError::from(PricingError::InvalidResource {
            reason: "base_price must be positive".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "invalid_resource");

        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pricing_error_message_passes_through() {
        let err = AppError::from(PricingError::OccupancyExceeded {
            max_guests: 6,
            requested: 9,
        });
        assert!(err.to_string().contains("6"));
    }
}
