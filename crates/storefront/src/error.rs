//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Responses are JSON; a 401 carries a `redirect`
//! hint pointing the shopper at sign-in.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::commerce::CommerceError;
use crate::storage::StorageError;

/// Where the facade sends unauthenticated shoppers.
pub const SIGN_IN_PATH: &str = "/auth/login";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persisted state operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Commerce backend operation failed.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Shopper is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Internal(_) | Self::Catalog(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Commerce(err) => match err {
                CommerceError::Unauthorized => StatusCode::UNAUTHORIZED,
                CommerceError::Api { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Storage(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Catalog(_) => "Catalog unavailable".to_string(),
            Self::Commerce(err) => match err {
                CommerceError::Unauthorized => "Please sign in to continue".to_string(),
                // Backend messages are written for shoppers; pass them through
                CommerceError::Api { message, .. } => message.clone(),
                _ => "External service error".to_string(),
            },
            _ => self.to_string(),
        };

        let redirect = (status == StatusCode::UNAUTHORIZED).then(|| SIGN_IN_PATH.to_string());

        (
            status,
            Json(ErrorBody {
                error: message,
                redirect,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
