use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::{MovieId, SearchResult};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The query could not be resolved to a catalog title with enough confidence
    #[error("Movie '{query}' not found")]
    TitleNotFound {
        query: String,
        suggestions: Vec<SearchResult>,
    },

    #[error("Movie {0} not found in catalog")]
    MovieNotFound(MovieId),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The per-endpoint request quota is exhausted for the current window
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::TitleNotFound { query, suggestions } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": format!("Movie '{}' not found", query),
                    "suggestions": suggestions,
                }),
            ),
            AppError::MovieNotFound(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": self.to_string() }),
            ),
            AppError::InvalidCatalog(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
