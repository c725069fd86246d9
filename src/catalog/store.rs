use std::collections::HashMap;

use crate::{
    catalog::CatalogSource,
    error::{AppError, AppResult},
    models::{Movie, MovieId},
};

/// Aggregates computed once at construction and consumed by popularity scoring
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatalogStats {
    pub max_vote_count: u64,
}

/// Immutable, insertion-ordered movie catalog
///
/// There are no mutating methods: once built, the store is shared behind an
/// `Arc` and read concurrently without locking.
#[derive(Debug)]
pub struct CatalogStore {
    movies: Vec<Movie>,
    index: HashMap<MovieId, usize>,
    dimension: Option<usize>,
    stats: CatalogStats,
}

impl CatalogStore {
    /// Validates and indexes the given movies
    ///
    /// Fails with `InvalidCatalog` on duplicate ids, empty titles, out-of-range
    /// ratings, non-finite embedding values, or embeddings whose dimension
    /// differs from the first entry (or from `expected_dimension` when set).
    pub fn new(movies: Vec<Movie>, expected_dimension: Option<usize>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(movies.len());
        let mut dimension = expected_dimension;
        let mut max_vote_count = 0;

        if dimension == Some(0) {
            return Err(AppError::InvalidCatalog(
                "embedding dimension must be positive".to_string(),
            ));
        }

        for (position, movie) in movies.iter().enumerate() {
            if index.insert(movie.id, position).is_some() {
                return Err(AppError::InvalidCatalog(format!(
                    "duplicate movie id {}",
                    movie.id
                )));
            }

            if movie.title.trim().is_empty() {
                return Err(AppError::InvalidCatalog(format!(
                    "movie {} has an empty title",
                    movie.id
                )));
            }

            if !movie.rating.is_finite() || !(0.0..=10.0).contains(&movie.rating) {
                return Err(AppError::InvalidCatalog(format!(
                    "movie {} has rating {} outside [0, 10]",
                    movie.id, movie.rating
                )));
            }

            let expected = *dimension.get_or_insert(movie.embedding.len());
            if movie.embedding.len() != expected || expected == 0 {
                return Err(AppError::InvalidCatalog(format!(
                    "movie {} has embedding dimension {}, expected {}",
                    movie.id,
                    movie.embedding.len(),
                    expected
                )));
            }

            if movie.embedding.iter().any(|v| !v.is_finite()) {
                return Err(AppError::InvalidCatalog(format!(
                    "movie {} has a non-finite embedding component",
                    movie.id
                )));
            }

            max_vote_count = max_vote_count.max(movie.vote_count);
        }

        Ok(Self {
            movies,
            index,
            dimension,
            stats: CatalogStats { max_vote_count },
        })
    }

    /// Loads movies from `source` and validates them into a store
    pub async fn load(
        source: &dyn CatalogSource,
        expected_dimension: Option<usize>,
    ) -> AppResult<Self> {
        tracing::info!(source = source.name(), "Loading catalog");

        let movies = source.load().await?;
        let store = Self::new(movies, expected_dimension)?;

        tracing::info!(
            source = source.name(),
            movies = store.size(),
            dimension = ?store.dimension(),
            max_vote_count = store.stats.max_vote_count,
            "Catalog loaded"
        );

        Ok(store)
    }

    pub fn get(&self, id: MovieId) -> AppResult<&Movie> {
        self.index
            .get(&id)
            .map(|&position| &self.movies[position])
            .ok_or(AppError::MovieNotFound(id))
    }

    /// Iterates all movies in insertion order
    pub fn all(&self) -> impl Iterator<Item = &Movie> + '_ {
        self.movies.iter()
    }

    pub fn size(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Shared embedding dimension, `None` for an empty store without a configured dimension
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn stats(&self) -> CatalogStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::MockCatalogSource;

    fn movie(id: u64, title: &str, embedding: Vec<f32>) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            genres: Default::default(),
            cast: vec![],
            director: String::new(),
            overview: String::new(),
            embedding,
            rating: 7.0,
            vote_count: id * 100,
        }
    }

    #[test]
    fn test_new_store_indexes_movies() {
        let store = CatalogStore::new(
            vec![
                movie(10, "Alien", vec![1.0, 0.0]),
                movie(20, "Aliens", vec![0.0, 1.0]),
            ],
            None,
        )
        .unwrap();

        assert_eq!(store.size(), 2);
        assert_eq!(store.dimension(), Some(2));
        assert_eq!(store.get(MovieId(20)).unwrap().title, "Aliens");
        assert_eq!(store.stats().max_vote_count, 2000);
    }

    #[test]
    fn test_all_preserves_insertion_order_and_restarts() {
        let store = CatalogStore::new(
            vec![
                movie(3, "Heat", vec![1.0]),
                movie(1, "Ronin", vec![1.0]),
                movie(2, "Collateral", vec![1.0]),
            ],
            None,
        )
        .unwrap();

        let first: Vec<MovieId> = store.all().map(|m| m.id).collect();
        let second: Vec<MovieId> = store.all().map(|m| m.id).collect();
        assert_eq!(first, vec![MovieId(3), MovieId(1), MovieId(2)]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_get_missing_movie() {
        let store = CatalogStore::new(vec![movie(1, "Heat", vec![1.0])], None).unwrap();
        let err = store.get(MovieId(99)).unwrap_err();
        assert!(matches!(err, AppError::MovieNotFound(MovieId(99))));
    }

    #[test]
    fn test_rejects_mismatched_dimensions() {
        let err = CatalogStore::new(
            vec![
                movie(1, "Heat", vec![1.0, 0.0]),
                movie(2, "Ronin", vec![1.0, 0.0, 0.0]),
            ],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(msg) if msg.contains("movie 2")));
    }

    #[test]
    fn test_rejects_unexpected_configured_dimension() {
        let err = CatalogStore::new(vec![movie(1, "Heat", vec![1.0, 0.0])], Some(384)).unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = CatalogStore::new(
            vec![movie(1, "Heat", vec![1.0]), movie(1, "Ronin", vec![1.0])],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_empty_title_and_bad_rating() {
        let err = CatalogStore::new(vec![movie(1, "  ", vec![1.0])], None).unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(_)));

        let mut bad = movie(2, "Heat", vec![1.0]);
        bad.rating = 11.0;
        let err = CatalogStore::new(vec![bad], None).unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(_)));
    }

    #[test]
    fn test_rejects_non_finite_embedding() {
        let err = CatalogStore::new(vec![movie(1, "Heat", vec![f32::NAN])], None).unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(_)));
    }

    #[test]
    fn test_rejects_zero_dimension_embeddings() {
        let err = CatalogStore::new(vec![movie(1, "Heat", vec![])], None).unwrap_err();
        assert!(matches!(err, AppError::InvalidCatalog(_)));
    }

    #[test]
    fn test_empty_store_is_valid() {
        let store = CatalogStore::new(vec![], None).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);
        assert_eq!(store.stats().max_vote_count, 0);
    }

    #[test]
    fn test_load_from_source() {
        let mut source = MockCatalogSource::new();
        source
            .expect_load()
            .times(1)
            .returning(|| Ok(vec![movie(1, "Heat", vec![1.0, 0.0])]));
        source.expect_name().return_const("mock");

        let store = tokio_test::block_on(CatalogStore::load(&source, Some(2))).unwrap();
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_load_propagates_validation_errors() {
        let mut source = MockCatalogSource::new();
        source.expect_load().returning(|| {
            Ok(vec![
                movie(1, "Heat", vec![1.0, 0.0]),
                movie(2, "Ronin", vec![1.0]),
            ])
        });
        source.expect_name().return_const("mock");

        let result = tokio_test::block_on(CatalogStore::load(&source, None));
        assert!(matches!(result, Err(AppError::InvalidCatalog(_))));
    }
}
