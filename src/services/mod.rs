pub mod popularity;
pub mod ranker;
pub mod recommendations;
pub mod selection;
pub mod title_resolver;

pub use popularity::{MeanPopularity, PopularityScorer, WeightedPopularity};
pub use ranker::{RankingWeights, SimilarityRanker};
pub use recommendations::RecommendationEngine;
pub use title_resolver::TitleResolver;
