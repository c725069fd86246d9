use std::time::Duration;

use axum::BoxError;
use tower::load_shed::error::Overloaded;

use crate::error::AppError;

/// Window over which per-endpoint quotas are counted
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Requests waiting for the rate-limited service before back-pressure applies
pub const RATE_LIMIT_QUEUE: usize = 1024;

/// Maps errors from the buffer/load-shed/rate-limit stack to API errors.
///
/// Shed requests mean the quota for the current window is spent.
pub async fn handle_rate_limit_error(err: BoxError) -> AppError {
    if err.is::<Overloaded>() {
        tracing::warn!("Request rejected: rate limit exceeded");
        AppError::RateLimited
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}
