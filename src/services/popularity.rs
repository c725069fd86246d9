use serde::Deserialize;

use crate::{
    catalog::CatalogStats,
    error::{AppError, AppResult},
    models::Movie,
};

/// Share of the weighted popularity score that comes from the rating
pub const DEFAULT_RATING_WEIGHT: f64 = 0.7;

/// Quality/popularity policy used to boost well-rated, well-known titles
///
/// Implementations must return a value in [0, 1] and depend only on the movie
/// and the catalog aggregates, so rankings stay reproducible.
pub trait PopularityScorer: Send + Sync {
    fn score(&self, movie: &Movie, stats: &CatalogStats) -> f64;

    /// Scheme name for logging
    fn name(&self) -> &'static str;
}

/// Selects a popularity scheme from configuration
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PopularityScheme {
    #[default]
    Weighted,
    Mean,
}

/// Log-scaled vote signal saturating at the most-voted movie in the catalog
pub fn vote_signal(vote_count: u64, max_vote_count: u64) -> f64 {
    if max_vote_count == 0 {
        return 0.0;
    }
    let votes = vote_count.min(max_vote_count) as f64;
    votes.ln_1p() / (max_vote_count as f64).ln_1p()
}

fn rating_signal(rating: f64) -> f64 {
    (rating / 10.0).clamp(0.0, 1.0)
}

/// `rating_weight * rating/10 + (1 - rating_weight) * vote_signal`
#[derive(Debug, Clone, Copy)]
pub struct WeightedPopularity {
    rating_weight: f64,
}

impl WeightedPopularity {
    pub fn new(rating_weight: f64) -> AppResult<Self> {
        if !rating_weight.is_finite() || !(0.0..=1.0).contains(&rating_weight) {
            return Err(AppError::InvalidArgument(format!(
                "rating weight {} must be within [0, 1]",
                rating_weight
            )));
        }
        Ok(Self { rating_weight })
    }
}

impl Default for WeightedPopularity {
    fn default() -> Self {
        Self {
            rating_weight: DEFAULT_RATING_WEIGHT,
        }
    }
}

impl PopularityScorer for WeightedPopularity {
    fn score(&self, movie: &Movie, stats: &CatalogStats) -> f64 {
        self.rating_weight * rating_signal(movie.rating)
            + (1.0 - self.rating_weight) * vote_signal(movie.vote_count, stats.max_vote_count)
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Arithmetic mean of the rating and vote signals
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanPopularity;

impl PopularityScorer for MeanPopularity {
    fn score(&self, movie: &Movie, stats: &CatalogStats) -> f64 {
        (rating_signal(movie.rating) + vote_signal(movie.vote_count, stats.max_vote_count)) / 2.0
    }

    fn name(&self) -> &'static str {
        "mean"
    }
}
