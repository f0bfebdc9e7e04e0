//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Vehicle unavailable: {0}")]
    Unavailable(String),

    #[error("Cancellation window closed: {0}")]
    TooLate(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Promo code inactive")]
    PromoInactive,

    #[error("Promo code outside validity window")]
    PromoOutOfWindow,

    #[error("Promo code usage limit reached")]
    PromoLimitReached,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("JWT error: {0}")]
    Jwt(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: None,
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: "Unauthorized".to_string(),
                    message: msg,
                    details: None,
                    code: Some("UNAUTHORIZED".to_string()),
                },
            ),

            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: "Forbidden".to_string(),
                    message: msg,
                    details: None,
                    code: Some("FORBIDDEN".to_string()),
                },
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                },
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Conflict".to_string(),
                    message: msg,
                    details: None,
                    code: Some("CONFLICT".to_string()),
                },
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Bad Request".to_string(),
                    message: msg,
                    details: None,
                    code: Some("BAD_REQUEST".to_string()),
                },
            ),

            AppError::Unavailable(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Vehicle Unavailable".to_string(),
                    message: msg,
                    details: None,
                    code: Some("VEHICLE_UNAVAILABLE".to_string()),
                },
            ),

            AppError::TooLate(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Too Late".to_string(),
                    message: msg,
                    details: None,
                    code: Some("CANCELLATION_TOO_LATE".to_string()),
                },
            ),

            AppError::InvalidState(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid State".to_string(),
                    message: msg,
                    details: None,
                    code: Some("INVALID_STATE".to_string()),
                },
            ),

            AppError::PaymentFailed(msg) => (
                StatusCode::PAYMENT_REQUIRED,
                ErrorResponse {
                    error: "Payment Failed".to_string(),
                    message: msg,
                    details: None,
                    code: Some("PAYMENT_FAILED".to_string()),
                },
            ),

            AppError::PromoInactive => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Promo Inactive".to_string(),
                    message: "This promo code is no longer active".to_string(),
                    details: None,
                    code: Some("PROMO_INACTIVE".to_string()),
                },
            ),

            AppError::PromoOutOfWindow => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Promo Out Of Window".to_string(),
                    message: "This promo code is not valid at this time".to_string(),
                    details: None,
                    code: Some("PROMO_OUT_OF_WINDOW".to_string()),
                },
            ),

            AppError::PromoLimitReached => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Promo Limit Reached".to_string(),
                    message: "This promo code has reached its usage limit".to_string(),
                    details: None,
                    code: Some("PROMO_LIMIT_REACHED".to_string()),
                },
            ),

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: None,
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }

            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Service Unavailable".to_string(),
                        message: msg,
                        details: None,
                        code: Some("SERVICE_UNAVAILABLE".to_string()),
                    },
                )
            }

            AppError::Jwt(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: "JWT Error".to_string(),
                    message: msg,
                    details: None,
                    code: Some("JWT_ERROR".to_string()),
                },
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
