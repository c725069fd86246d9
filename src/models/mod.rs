use serde::{Deserialize, Serialize};

mod movie;

pub use movie::{Movie, MovieId};

/// A single ranked recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub movie_id: MovieId,
    pub title: String,
    pub rating: f64,
    pub vote_count: u64,
    /// Raw cosine similarity to the input movie
    pub similarity: f64,
    /// Blended similarity/popularity score the list is ordered by
    pub score: f64,
}

/// Outcome of a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSet {
    /// Catalog title the query resolved to
    pub input_movie: String,
    pub input_movie_id: MovieId,
    /// Fuzzy match confidence of the resolution, in [0, 1]
    pub match_score: f64,
    pub total_recommendations: usize,
    pub recommendations: Vec<RecommendationResult>,
}

/// Title search hit, also used as a "did you mean" suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub movie_id: MovieId,
    pub title: String,
    pub match_score: f64,
    pub rating: f64,
    pub vote_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub movie_id: MovieId,
    pub title: String,
    pub rating: f64,
    pub vote_count: u64,
    pub overview: String,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub director: String,
}

impl From<&Movie> for MovieDetails {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            rating: movie.rating,
            vote_count: movie.vote_count,
            overview: movie.overview.clone(),
            genres: movie.genres.iter().cloned().collect(),
            cast: movie.cast.clone(),
            director: movie.director.clone(),
        }
    }
}
