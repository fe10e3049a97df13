//! Error handling for the Restaurant Inventory Management Platform
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::StockShortfall;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Validation error")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(String),

    #[error("Invalid delta: {0}")]
    InvalidDelta(String),

    /// Business rejection naming every under-supplied product
    #[error("Insufficient stock")]
    InsufficientStock { shortfalls: Vec<StockShortfall> },

    /// Ledger-level rejection detected at commit time; the production
    /// executor converts this into a rejected run instead of surfacing it
    #[error("Stock batch rejected")]
    BatchRejected { shortfalls: Vec<StockShortfall> },

    // Infrastructure errors
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfalls: Option<Vec<StockShortfall>>,
}

impl ErrorDetail {
    fn new(code: &str, message_en: String, message_es: String) -> Self {
        Self {
            code: code.to_string(),
            message_en,
            message_es,
            field: None,
            shortfalls: None,
        }
    }
}

fn shortfall_messages(shortfalls: &[StockShortfall]) -> (String, String) {
    let detail = shortfalls
        .iter()
        .map(|s| format!("{} ({} < {})", s.product_code, s.available, s.required))
        .collect::<Vec<_>>()
        .join(", ");
    (
        format!("Insufficient stock: {}", detail),
        format!("Stock insuficiente: {}", detail),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", message.clone(), message_es.clone())
                },
            ),
            AppError::InvalidInput(errors) => {
                let fields = errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorDetail {
                        field: Some(fields.clone()),
                        ..ErrorDetail::new(
                            "VALIDATION_ERROR",
                            format!("One or more fields are invalid: {}", fields),
                            format!("Uno o más campos son inválidos: {}", fields),
                        )
                    },
                )
            }
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new(
                        "DUPLICATE_ENTRY",
                        format!("A record with this {} already exists", field),
                        format!("Ya existe un registro con este {}", field),
                    )
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{} no encontrado", resource),
                ),
            ),
            AppError::InvalidRecipe(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INVALID_RECIPE",
                    msg.clone(),
                    format!("Receta inválida: {}", msg),
                ),
            ),
            AppError::InvalidQuantity(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INVALID_QUANTITY",
                    msg.clone(),
                    format!("Cantidad inválida: {}", msg),
                ),
            ),
            AppError::InvalidMultiplier(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INVALID_MULTIPLIER",
                    msg.clone(),
                    format!("Multiplicador inválido: {}", msg),
                ),
            ),
            AppError::InvalidDelta(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new(
                    "INVALID_DELTA",
                    msg.clone(),
                    format!("Movimiento inválido: {}", msg),
                ),
            ),
            AppError::InsufficientStock { shortfalls } => {
                let (en, es) = shortfall_messages(shortfalls);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorDetail {
                        shortfalls: Some(shortfalls.clone()),
                        ..ErrorDetail::new("INSUFFICIENT_STOCK", en, es)
                    },
                )
            }
            AppError::BatchRejected { shortfalls } => {
                let (en, es) = shortfall_messages(shortfalls);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorDetail {
                        shortfalls: Some(shortfalls.clone()),
                        ..ErrorDetail::new("BATCH_REJECTED", en, es)
                    },
                )
            }
            AppError::StorageUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "STORAGE_UNAVAILABLE",
                    "Storage is temporarily unavailable, retry the request".to_string(),
                    "El almacenamiento no está disponible, reintente la solicitud".to_string(),
                ),
            ),
            // Pool exhaustion and connection loss are transient; failed calls
            // leave no partial side effects, so a full retry is safe
            AppError::DatabaseError(e)
                if matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                ) =>
            {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorDetail::new(
                        "STORAGE_UNAVAILABLE",
                        "Storage is temporarily unavailable, retry the request".to_string(),
                        "El almacenamiento no está disponible, reintente la solicitud".to_string(),
                    ),
                )
            }
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    "Ocurrió un error de base de datos".to_string(),
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    msg.clone(),
                    "Ocurrió un error interno del servidor".to_string(),
                ),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    "Ocurrió un error interno del servidor".to_string(),
                ),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
