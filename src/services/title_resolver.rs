//! Fuzzy title resolution
//!
//! Maps free-text input (typos, reordered words, extra words) onto a catalog
//! title. Scoring is a weighted ratio in the style of rapidfuzz's `WRatio`: the
//! best of a plain indel ratio, token-based ratios and a partial (substring)
//! ratio, with the latter two scaled down so exact matches always win.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::Movie,
};

/// Default minimum confidence for accepting a match
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Longest normalized query that is scored; anything beyond is ignored
///
/// Partial matching is quadratic in the query length per title.
pub const MAX_QUERY_CHARS: usize = 200;

const TOKEN_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// A catalog movie together with its fuzzy match score in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMatch<'a> {
    pub movie: &'a Movie,
    pub score: f64,
}

/// Resolves free-text queries to catalog entries
#[derive(Debug, Clone, Copy)]
pub struct TitleResolver {
    threshold: f64,
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl TitleResolver {
    pub fn new(threshold: f64) -> AppResult<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::InvalidArgument(format!(
                "resolver threshold {} must be within [0, 1]",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the best-matching movie, or `None` when nothing reaches the threshold
    ///
    /// Ties on score go to the movie with more votes, then to the lowest id.
    pub fn resolve<'a>(&self, query: &str, catalog: &'a CatalogStore) -> Option<TitleMatch<'a>> {
        let best = score_catalog(query, catalog).min_by(match_order)?;

        if best.score < self.threshold {
            tracing::debug!(
                query = %query,
                best_title = %best.movie.title,
                best_score = best.score,
                threshold = self.threshold,
                "No confident title match"
            );
            return None;
        }

        tracing::debug!(
            query = %query,
            title = %best.movie.title,
            score = best.score,
            "Title resolved"
        );
        Some(best)
    }

    /// Resolves `query`, or returns up to `limit` closest titles when no match is confident
    ///
    /// Scores the catalog once for both outcomes.
    pub fn resolve_or_suggest<'a>(
        &self,
        query: &str,
        catalog: &'a CatalogStore,
        limit: usize,
    ) -> Result<TitleMatch<'a>, Vec<TitleMatch<'a>>> {
        let mut matches: Vec<TitleMatch<'a>> = score_catalog(query, catalog).collect();
        matches.sort_by(match_order);

        match matches.first() {
            Some(best) if best.score >= self.threshold => Ok(*best),
            _ => {
                matches.truncate(limit);
                Err(matches)
            }
        }
    }

    /// Returns up to `limit` best matches regardless of the threshold
    pub fn search<'a>(
        &self,
        query: &str,
        catalog: &'a CatalogStore,
        limit: usize,
    ) -> Vec<TitleMatch<'a>> {
        let mut matches: Vec<TitleMatch<'a>> = score_catalog(query, catalog).collect();
        matches.sort_by(match_order);
        matches.truncate(limit);
        matches
    }
}

fn score_catalog<'a>(
    query: &str,
    catalog: &'a CatalogStore,
) -> impl Iterator<Item = TitleMatch<'a>> + 'a {
    let query = bounded_query(query);
    catalog.all().map(move |movie| TitleMatch {
        movie,
        score: weighted_ratio(&query, &normalize(&movie.title)),
    })
}

/// Best match first: score desc, vote count desc, id asc
fn match_order(a: &TitleMatch<'_>, b: &TitleMatch<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.movie.vote_count.cmp(&a.movie.vote_count))
        .then_with(|| a.movie.id.cmp(&b.movie.id))
}

/// Normalizes `query` and caps it at `MAX_QUERY_CHARS` characters
pub fn bounded_query(query: &str) -> String {
    let normalized = normalize(query);
    match normalized.char_indices().nth(MAX_QUERY_CHARS) {
        Some((cut, _)) => normalized[..cut].trim_end().to_string(),
        None => normalized,
    }
}

/// Lowercases, turns punctuation into spaces and collapses whitespace
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            cleaned.extend(c.to_lowercase());
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Weighted similarity of two normalized strings, in [0, 1]
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let base = ratio(&a_chars, &b_chars);
    let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));

    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars.len() as f64, b_chars.len() as f64)
    } else {
        (b_chars.len() as f64, a_chars.len() as f64)
    };
    let length_ratio = long / short;

    if length_ratio < 1.5 {
        return base.max(token * TOKEN_SCALE).min(1.0);
    }

    let partial_scale = if length_ratio < 8.0 {
        PARTIAL_SCALE
    } else {
        LONG_PARTIAL_SCALE
    };

    base.max(partial_ratio(&a_chars, &b_chars) * partial_scale)
        .max(token * TOKEN_SCALE * partial_scale)
        .min(1.0)
}

/// Normalized indel similarity: `2 * LCS / (|a| + |b|)`
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Best ratio of the shorter string against each equal-length window of the longer
fn partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        best = best.max(ratio(short, window));
        if best >= 1.0 {
            break;
        }
    }
    best
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let sorted = |s: &str| -> Vec<char> {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ").chars().collect()
    };
    ratio(&sorted(a), &sorted(b))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection: Vec<&str> = a_tokens.intersection(&b_tokens).copied().collect();
    let a_only: Vec<&str> = a_tokens.difference(&b_tokens).copied().collect();
    let b_only: Vec<&str> = b_tokens.difference(&a_tokens).copied().collect();

    if intersection.is_empty() {
        let a_rest: Vec<char> = a_only.join(" ").chars().collect();
        let b_rest: Vec<char> = b_only.join(" ").chars().collect();
        return ratio(&a_rest, &b_rest);
    }

    // One token set contains the other
    if a_only.is_empty() || b_only.is_empty() {
        return 1.0;
    }

    let common = intersection.join(" ");
    let with_a: Vec<char> = format!("{} {}", common, a_only.join(" ")).chars().collect();
    let with_b: Vec<char> = format!("{} {}", common, b_only.join(" ")).chars().collect();
    let common: Vec<char> = common.chars().collect();

    ratio(&common, &with_a)
        .max(ratio(&common, &with_b))
        .max(ratio(&with_a, &with_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieId;

    fn movie(id: u64, title: &str, vote_count: u64) -> Movie {
        Movie {
            id: MovieId(id),
            title: title.to_string(),
            genres: Default::default(),
            cast: vec![],
            director: String::new(),
            overview: String::new(),
            embedding: vec![1.0],
            rating: 7.5,
            vote_count,
        }
    }

    fn catalog() -> CatalogStore {
        CatalogStore::new(
            vec![
                movie(27205, "Inception", 13752),
                movie(157336, "Interstellar", 10867),
                movie(603, "The Matrix", 8907),
                movie(1726, "Iron Man", 8776),
                movie(68721, "Iron Man 3", 8806),
                movie(155, "The Dark Knight", 12002),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  The Lord of the Rings: The Return  "), "the lord of the rings the return");
        assert_eq!(normalize("WALL·E"), "wall e");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_weighted_ratio_identical_is_one() {
        assert_eq!(weighted_ratio("inception", "inception"), 1.0);
    }

    #[test]
    fn test_weighted_ratio_empty_is_zero() {
        assert_eq!(weighted_ratio("", "inception"), 0.0);
        assert_eq!(weighted_ratio("inception", ""), 0.0);
    }

    #[test]
    fn test_weighted_ratio_word_order() {
        let score = weighted_ratio("knight dark the", "the dark knight");
        assert!(score >= 0.95 - 1e-9, "score was {}", score);
    }

    #[test]
    fn test_weighted_ratio_substring_scores_high() {
        let score = weighted_ratio("matrix", "i want something like the matrix please");
        assert!(score >= 0.85, "score was {}", score);
    }

    #[test]
    fn test_ratio_transposition() {
        let a: Vec<char> = "inceptoin".chars().collect();
        let b: Vec<char> = "inception".chars().collect();
        let score = ratio(&a, &b);
        assert!((score - 16.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_tolerates_typos() {
        let catalog = catalog();
        let resolver = TitleResolver::new(0.6).unwrap();

        let found = resolver.resolve("Inceptoin", &catalog).unwrap();
        assert_eq!(found.movie.title, "Inception");
        assert!(found.score >= 0.6);
    }

    #[test]
    fn test_resolve_is_case_and_punctuation_insensitive() {
        let catalog = catalog();
        let resolver = TitleResolver::default();

        let found = resolver.resolve("the MATRIX!!", &catalog).unwrap();
        assert_eq!(found.movie.id, MovieId(603));
        assert_eq!(found.score, 1.0);
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        let catalog = catalog();
        let resolver = TitleResolver::new(0.6).unwrap();
        assert!(resolver.resolve("zzzzxxxxqqqq", &catalog).is_none());
    }

    #[test]
    fn test_resolve_prefers_exact_over_superset_title() {
        let catalog = catalog();
        let resolver = TitleResolver::default();

        let found = resolver.resolve("iron man", &catalog).unwrap();
        assert_eq!(found.movie.id, MovieId(1726));
    }

    #[test]
    fn test_resolve_tie_breaks_on_votes_then_id() {
        let catalog = CatalogStore::new(
            vec![
                movie(3, "Heat", 100),
                movie(2, "Heat", 500),
                movie(1, "Heat", 500),
            ],
            None,
        )
        .unwrap();
        let resolver = TitleResolver::default();

        let found = resolver.resolve("heat", &catalog).unwrap();
        assert_eq!(found.movie.id, MovieId(1));
    }

    #[test]
    fn test_resolve_empty_catalog() {
        let catalog = CatalogStore::new(vec![], None).unwrap();
        assert!(TitleResolver::default().resolve("Heat", &catalog).is_none());
    }

    #[test]
    fn test_search_orders_and_limits() {
        let catalog = catalog();
        let resolver = TitleResolver::default();

        let results = resolver.search("iron man", &catalog, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].movie.title, "Iron Man");
        assert_eq!(results[1].movie.title, "Iron Man 3");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_bounded_query_caps_length() {
        let long = "Abcdefghij".repeat(400);
        let bounded = bounded_query(&long);
        assert_eq!(bounded.chars().count(), MAX_QUERY_CHARS);
        assert!(bounded.starts_with("abcdefghij"));

        assert_eq!(bounded_query("The Matrix!"), "the matrix");
    }

    #[test]
    fn test_oversized_query_is_scored_on_its_prefix() {
        let catalog = catalog();
        let resolver = TitleResolver::default();

        let query = format!("Inception {}", "z".repeat(5000));
        let results = resolver.search(&query, &catalog, 1);
        assert_eq!(results[0].movie.title, "Inception");
    }

    #[test]
    fn test_resolve_or_suggest_hit_matches_resolve() {
        let catalog = catalog();
        let resolver = TitleResolver::default();

        let found = resolver.resolve_or_suggest("Inceptoin", &catalog, 3).unwrap();
        let resolved = resolver.resolve("Inceptoin", &catalog).unwrap();
        assert_eq!(found, resolved);
    }

    #[test]
    fn test_resolve_or_suggest_miss_returns_ranked_suggestions() {
        let catalog = catalog();
        let resolver = TitleResolver::new(0.99).unwrap();

        let suggestions = resolver.resolve_or_suggest("iron mn", &catalog, 2).unwrap_err();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].movie.title, "Iron Man");
        assert!(suggestions[0].score >= suggestions[1].score);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            TitleResolver::new(1.5),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(TitleResolver::new(f64::NAN).is_err());
    }
}
