use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::RequestDefaults;
use crate::services::RecommendationEngine;

/// Shared application state
///
/// Everything behind the `Arc` is immutable after startup, so handlers read it
/// without any locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub defaults: RequestDefaults,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Creates application state around a fully built engine
    pub fn new(engine: RecommendationEngine, defaults: RequestDefaults) -> Self {
        Self {
            engine: Arc::new(engine),
            defaults,
            loaded_at: Utc::now(),
        }
    }
}
