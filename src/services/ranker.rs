use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::Movie,
    services::popularity::{PopularityScorer, WeightedPopularity},
};

pub const DEFAULT_SIMILARITY_WEIGHT: f64 = 0.6;
pub const DEFAULT_POPULARITY_WEIGHT: f64 = 0.4;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Blend weights for `similarity * w_sim + popularity * w_pop`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    similarity: f64,
    popularity: f64,
}

impl RankingWeights {
    /// Weights must be non-negative, sum to 1, and keep similarity dominant
    pub fn new(similarity: f64, popularity: f64) -> AppResult<Self> {
        if !similarity.is_finite() || !popularity.is_finite() || similarity < 0.0 || popularity < 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "ranking weights must be non-negative, got w_sim={} w_pop={}",
                similarity, popularity
            )));
        }
        if (similarity + popularity - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AppError::InvalidArgument(format!(
                "ranking weights must sum to 1, got w_sim={} w_pop={}",
                similarity, popularity
            )));
        }
        if similarity < popularity {
            return Err(AppError::InvalidArgument(format!(
                "similarity weight {} must not be smaller than popularity weight {}",
                similarity, popularity
            )));
        }
        Ok(Self {
            similarity,
            popularity,
        })
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn popularity(&self) -> f64 {
        self.popularity
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            similarity: DEFAULT_SIMILARITY_WEIGHT,
            popularity: DEFAULT_POPULARITY_WEIGHT,
        }
    }
}

/// A candidate with the signals that produced its ranking score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMovie<'a> {
    pub movie: &'a Movie,
    pub similarity: f64,
    pub popularity: f64,
    pub score: f64,
}

/// Cosine similarity accumulated in f64
///
/// Returns 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Ranks the catalog against a query movie by blended similarity and popularity
#[derive(Clone)]
pub struct SimilarityRanker {
    weights: RankingWeights,
    popularity: Arc<dyn PopularityScorer>,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new(RankingWeights::default(), Arc::new(WeightedPopularity::default()))
    }
}

impl SimilarityRanker {
    pub fn new(weights: RankingWeights, popularity: Arc<dyn PopularityScorer>) -> Self {
        Self {
            weights,
            popularity,
        }
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    pub fn popularity_scheme(&self) -> &'static str {
        self.popularity.name()
    }

    /// Scores every catalog movie except `query` and returns them best first
    ///
    /// Order is score desc, then vote count desc, then id asc.
    pub fn rank<'a>(&self, query: &Movie, catalog: &'a CatalogStore) -> Vec<RankedMovie<'a>> {
        let stats = catalog.stats();

        let mut ranked: Vec<RankedMovie<'a>> = catalog
            .all()
            .filter(|movie| movie.id != query.id)
            .map(|movie| {
                let similarity = cosine_similarity(&query.embedding, &movie.embedding);
                let popularity = self.popularity.score(movie, &stats);
                RankedMovie {
                    movie,
                    similarity,
                    popularity,
                    score: self.weights.similarity * similarity
                        + self.weights.popularity * popularity,
                }
            })
            .collect();

        ranked.sort_by(ranking_order);
        ranked
    }
}

fn ranking_order(a: &RankedMovie<'_>, b: &RankedMovie<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.movie.vote_count.cmp(&a.movie.vote_count))
        .then_with(|| a.movie.id.cmp(&b.movie.id))
}
