use crate::{
    error::{AppError, AppResult},
    models::RecommendationResult,
    services::ranker::RankedMovie,
};

/// Validates caller thresholds before any work is done
pub fn validate_filters(min_rating: f64, min_votes: i64, top_n: i64) -> AppResult<()> {
    if top_n <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "top_n must be positive, got {}",
            top_n
        )));
    }
    if !min_rating.is_finite() || !(0.0..=10.0).contains(&min_rating) {
        return Err(AppError::InvalidArgument(format!(
            "min_rating must be within [0, 10], got {}",
            min_rating
        )));
    }
    if min_votes < 0 {
        return Err(AppError::InvalidArgument(format!(
            "min_votes must not be negative, got {}",
            min_votes
        )));
    }
    Ok(())
}

/// Keeps ranked movies meeting both thresholds, in rank order, up to `top_n`
///
/// Returning fewer than `top_n` results (including none) is not an error.
pub fn select(
    ranked: &[RankedMovie<'_>],
    min_rating: f64,
    min_votes: i64,
    top_n: i64,
) -> AppResult<Vec<RecommendationResult>> {
    validate_filters(min_rating, min_votes, top_n)?;

    let min_votes = min_votes as u64;
    let top_n = usize::try_from(top_n).unwrap_or(usize::MAX);

    Ok(ranked
        .iter()
        .filter(|r| r.movie.rating >= min_rating && r.movie.vote_count >= min_votes)
        .take(top_n)
        .map(|r| RecommendationResult {
            movie_id: r.movie.id,
            title: r.movie.title.clone(),
            rating: r.movie.rating,
            vote_count: r.movie.vote_count,
            similarity: r.similarity,
            score: r.score,
        })
        .collect())
}
