use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::{AppError, AppResult};

/// Runs `fut` under an optional deadline. Expiry becomes `AppError::Timeout`
/// naming `what`.
pub async fn with_timeout<F, T>(limit: Option<Duration>, what: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match limit {
        Some(limit) => time::timeout(limit, fut)
            .await
            .map_err(|_| AppError::Timeout(format!("{} after {:?}", what, limit)))?,
        None => fut.await,
    }
}
