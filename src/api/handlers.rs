use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{MovieDetails, RecommendationSet, SearchResult};

use super::AppState;

const MAX_TITLE_CHARS: usize = 200;
const MIN_SEARCH_CHARS: usize = 2;
const DEFAULT_SEARCH_LIMIT: usize = 5;

// Request/Response types

/// Omitted fields fall back to the configured defaults
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    pub top_n: Option<i64>,
    pub min_rating: Option<f64>,
    pub min_votes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub total_movies: usize,
    pub loaded_at: DateTime<Utc>,
}

// Handlers

/// Service info and endpoint listing
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Movie Recommender API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /recommend": "Get movie recommendations",
            "GET /search": "Search for movies",
            "GET /movie/:title": "Get movie details",
            "GET /health": "Health check",
        }
    }))
}

/// Recommend movies similar to the requested title
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationSet>> {
    let title = checked_title(&request.title)?;

    let defaults = state.defaults;
    let top_n = request.top_n.unwrap_or(defaults.top_n);
    let min_rating = request.min_rating.unwrap_or(defaults.min_rating);
    let min_votes = request.min_votes.unwrap_or(defaults.min_votes);

    if top_n > defaults.max_top_n {
        return Err(AppError::InvalidArgument(format!(
            "top_n must not exceed {}",
            defaults.max_top_n
        )));
    }

    tracing::info!(
        request_id = %request_id,
        title = %title,
        top_n,
        min_rating,
        min_votes,
        "Processing recommendation request"
    );

    // Ranking scans the whole catalog; keep it off the async workers
    let engine = state.engine.clone();
    let set = tokio::task::spawn_blocking(move || {
        engine.recommend(&title, top_n, min_rating, min_votes)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(set))
}

/// Fuzzy title search for autocomplete
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.query.trim().to_string();
    let chars = query.chars().count();
    if !(MIN_SEARCH_CHARS..=MAX_TITLE_CHARS).contains(&chars) {
        return Err(AppError::InvalidArgument(format!(
            "query must be between {} and {} characters",
            MIN_SEARCH_CHARS, MAX_TITLE_CHARS
        )));
    }

    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(state.defaults.max_search_limit);

    let engine = state.engine.clone();
    let lookup = query.clone();
    let results = tokio::task::spawn_blocking(move || engine.search(&lookup, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(SearchResponse {
        query,
        total_results: results.len(),
        results,
    }))
}

/// Details for a fuzzily matched title
pub async fn movie_details(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<Json<MovieDetails>> {
    let title = checked_title(&title)?;

    let engine = state.engine.clone();
    let details = tokio::task::spawn_blocking(move || engine.details(&title))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(details))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.engine.healthy();
    let status = if healthy {
        StatusCode::OK
    } else {
        tracing::warn!("Health check failed: catalog is empty");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            model_loaded: healthy,
            total_movies: state.engine.catalog().size(),
            loaded_at: state.loaded_at,
        }),
    )
}

/// Trimmed title, rejected when empty or longer than `MAX_TITLE_CHARS`
fn checked_title(raw: &str) -> AppResult<String> {
    let title = raw.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::InvalidArgument(format!(
            "title must be between 1 and {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}
