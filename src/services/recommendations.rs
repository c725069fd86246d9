use std::sync::Arc;
use std::time::Instant;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::{MovieDetails, RecommendationSet, SearchResult},
    services::{
        ranker::SimilarityRanker,
        selection::{select, validate_filters},
        title_resolver::{TitleMatch, TitleResolver},
    },
};

/// Number of "did you mean" suggestions attached to an unresolved title
const SUGGESTION_LIMIT: usize = 3;

/// Content-based recommendation engine over an immutable catalog
///
/// Composes title resolution, similarity ranking and threshold selection.
/// Holds no mutable state, so a single instance is shared across requests.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<CatalogStore>,
    resolver: TitleResolver,
    ranker: SimilarityRanker,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<CatalogStore>, resolver: TitleResolver, ranker: SimilarityRanker) -> Self {
        Self {
            catalog,
            resolver,
            ranker,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// True once the catalog is loaded and holds at least one movie
    pub fn healthy(&self) -> bool {
        !self.catalog.is_empty()
    }

    /// Recommends movies similar to the one `title` resolves to
    ///
    /// Arguments are validated before any scoring. Unresolvable titles fail with
    /// `TitleNotFound` carrying the closest catalog titles as suggestions.
    pub fn recommend(
        &self,
        title: &str,
        top_n: i64,
        min_rating: f64,
        min_votes: i64,
    ) -> AppResult<RecommendationSet> {
        let start = Instant::now();
        validate_filters(min_rating, min_votes, top_n)?;

        let resolved = self.resolve_or_suggest(title)?;
        let ranked = self.ranker.rank(resolved.movie, &self.catalog);
        let recommendations = select(&ranked, min_rating, min_votes, top_n)?;

        tracing::info!(
            query = %title,
            input_movie = %resolved.movie.title,
            match_score = resolved.score,
            candidates = ranked.len(),
            returned = recommendations.len(),
            popularity_scheme = self.ranker.popularity_scheme(),
            elapsed_ms = start.elapsed().as_millis(),
            "Generated recommendations"
        );

        Ok(RecommendationSet {
            input_movie: resolved.movie.title.clone(),
            input_movie_id: resolved.movie.id,
            match_score: resolved.score,
            total_recommendations: recommendations.len(),
            recommendations,
        })
    }

    /// Fuzzy title search for autocomplete
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.resolver
            .search(query, &self.catalog, limit)
            .into_iter()
            .map(search_result)
            .collect()
    }

    /// Details for the movie `title` resolves to
    pub fn details(&self, title: &str) -> AppResult<MovieDetails> {
        let resolved = self.resolve_or_suggest(title)?;
        Ok(MovieDetails::from(resolved.movie))
    }

    fn resolve_or_suggest(&self, title: &str) -> AppResult<TitleMatch<'_>> {
        self.resolver
            .resolve_or_suggest(title, &self.catalog, SUGGESTION_LIMIT)
            .map_err(|closest| {
                let suggestions: Vec<SearchResult> = closest.into_iter().map(search_result).collect();
                tracing::info!(
                    query = %title,
                    suggestions = suggestions.len(),
                    "Title not found"
                );
                AppError::TitleNotFound {
                    query: title.to_string(),
                    suggestions,
                }
            })
    }
}

fn search_result(found: TitleMatch<'_>) -> SearchResult {
    SearchResult {
        movie_id: found.movie.id,
        title: found.movie.title.clone(),
        match_score: found.score,
        rating: found.movie.rating,
        vote_count: found.movie.vote_count,
    }
}
