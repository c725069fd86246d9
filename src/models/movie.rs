use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display};

/// Stable catalog identifier for a movie (TMDB id in the shipped dataset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry with its precomputed overview embedding
///
/// Movies are produced by the offline ingestion job and never change while the
/// service is running.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: BTreeSet<String>,
    /// Billing order
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub overview: String,
    pub embedding: Vec<f32>,
    /// Average user rating on a 0-10 scale
    pub rating: f64,
    pub vote_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_display() {
        assert_eq!(format!("{}", MovieId(27205)), "27205");
    }

    #[test]
    fn test_movie_deserialize_with_defaults() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "embedding": [0.6, 0.8],
            "rating": 8.1,
            "vote_count": 13752
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, MovieId(27205));
        assert_eq!(movie.title, "Inception");
        assert!(movie.genres.is_empty());
        assert!(movie.cast.is_empty());
        assert_eq!(movie.director, "");
        assert_eq!(movie.embedding, vec![0.6, 0.8]);
        assert_eq!(movie.vote_count, 13752);
    }

    #[test]
    fn test_movie_genres_are_a_set() {
        let json = r#"{
            "id": 1,
            "title": "Alien",
            "genres": ["Science Fiction", "Horror", "Horror"],
            "embedding": [1.0],
            "rating": 7.9,
            "vote_count": 4470
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.genres.len(), 2);
        assert_eq!(
            movie.genres.iter().cloned().collect::<Vec<_>>(),
            vec!["Horror".to_string(), "Science Fiction".to_string()]
        );
    }
}
