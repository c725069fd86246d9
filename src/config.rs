use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    services::{
        popularity::{MeanPopularity, PopularityScheme, PopularityScorer, WeightedPopularity},
        ranker::{RankingWeights, SimilarityRanker},
        title_resolver::TitleResolver,
    },
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path of the JSON catalog produced by the ingestion job
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Expected embedding dimension; inferred from the catalog when unset
    #[serde(default)]
    pub embedding_dim: Option<usize>,

    /// Minimum fuzzy match confidence in [0, 1]
    #[serde(default = "default_resolver_threshold")]
    pub resolver_threshold: f64,

    #[serde(default = "default_similarity_weight")]
    pub similarity_weight: f64,

    #[serde(default = "default_popularity_weight")]
    pub popularity_weight: f64,

    #[serde(default)]
    pub popularity_scheme: PopularityScheme,

    /// Rating share of the weighted popularity scheme
    #[serde(default = "default_rating_weight")]
    pub rating_weight: f64,

    #[serde(default = "default_top_n")]
    pub default_top_n: i64,

    #[serde(default = "default_min_rating")]
    pub default_min_rating: f64,

    #[serde(default = "default_min_votes")]
    pub default_min_votes: i64,

    /// Upper bound on `top_n` accepted from clients
    #[serde(default = "default_max_top_n")]
    pub max_top_n: i64,

    #[serde(default = "default_max_search_limit")]
    pub max_search_limit: usize,

    /// Requests per minute accepted on `/recommend`
    #[serde(default = "default_recommend_per_minute")]
    pub recommend_per_minute: u64,

    /// Requests per minute accepted on each of `/search` and `/movie/:title`
    #[serde(default = "default_lookup_per_minute")]
    pub lookup_per_minute: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "./data/catalog.json".to_string()
}

fn default_resolver_threshold() -> f64 {
    crate::services::title_resolver::DEFAULT_THRESHOLD
}

fn default_similarity_weight() -> f64 {
    crate::services::ranker::DEFAULT_SIMILARITY_WEIGHT
}

fn default_popularity_weight() -> f64 {
    crate::services::ranker::DEFAULT_POPULARITY_WEIGHT
}

fn default_rating_weight() -> f64 {
    crate::services::popularity::DEFAULT_RATING_WEIGHT
}

fn default_top_n() -> i64 {
    10
}

fn default_min_rating() -> f64 {
    6.0
}

fn default_min_votes() -> i64 {
    50
}

fn default_max_top_n() -> i64 {
    50
}

fn default_max_search_limit() -> usize {
    20
}

fn default_recommend_per_minute() -> u64 {
    10
}

fn default_lookup_per_minute() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Request defaults and bounds applied by the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDefaults {
    pub top_n: i64,
    pub min_rating: f64,
    pub min_votes: i64,
    pub max_top_n: i64,
    pub max_search_limit: usize,
    pub recommend_per_minute: u64,
    pub lookup_per_minute: u64,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_rating: default_min_rating(),
            min_votes: default_min_votes(),
            max_top_n: default_max_top_n(),
            max_search_limit: default_max_search_limit(),
            recommend_per_minute: default_recommend_per_minute(),
            lookup_per_minute: default_lookup_per_minute(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Validated title resolver
    pub fn resolver(&self) -> AppResult<TitleResolver> {
        TitleResolver::new(self.resolver_threshold)
    }

    /// Validated ranker with the configured weights and popularity scheme
    pub fn ranker(&self) -> AppResult<SimilarityRanker> {
        let weights = RankingWeights::new(self.similarity_weight, self.popularity_weight)?;
        let popularity: Arc<dyn PopularityScorer> = match self.popularity_scheme {
            PopularityScheme::Weighted => Arc::new(WeightedPopularity::new(self.rating_weight)?),
            PopularityScheme::Mean => Arc::new(MeanPopularity),
        };
        Ok(SimilarityRanker::new(weights, popularity))
    }

    /// Request defaults; rate limits are floored at one request per minute
    pub fn request_defaults(&self) -> RequestDefaults {
        RequestDefaults {
            top_n: self.default_top_n,
            min_rating: self.default_min_rating,
            min_votes: self.default_min_votes,
            max_top_n: self.max_top_n,
            max_search_limit: self.max_search_limit,
            recommend_per_minute: self.recommend_per_minute.max(1),
            lookup_per_minute: self.lookup_per_minute.max(1),
        }
    }
}
