//! Catalog source abstraction
//!
//! The catalog is built offline by the ingestion job. A source only knows how to
//! hand back the raw movie records; validation happens in `CatalogStore`.
use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every movie record in insertion order
    async fn load(&self) -> AppResult<Vec<Movie>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Reads the catalog from a JSON array of movie records
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonFileSource {
    async fn load(&self) -> AppResult<Vec<Movie>> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::InvalidCatalog(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let movies: Vec<Movie> = serde_json::from_slice(&raw).map_err(|e| {
            AppError::InvalidCatalog(format!("failed to parse {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = raw.len(),
            movies = movies.len(),
            "Catalog file parsed"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}
