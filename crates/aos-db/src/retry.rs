//! Compare-and-swap retry with exponential backoff.
//!
//! Conditional updates (`... WHERE version = ?`) report a lost race as zero
//! affected rows. Callers re-read, re-plan, and try again through
//! [`retry_on_conflict`] until the update lands or attempts run out.

use std::future::Future;
use std::time::Duration;

use crate::error::DatabaseError;

/// Retry behavior for conditional updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Backoff is capped here.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Delay after the given failed attempt (1-based): `base * 2^(attempt-1)`, capped.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Run `op` until it yields `Some`, sleeping between attempts.
///
/// `op` receives the 1-based attempt number and returns `Ok(None)` when its
/// conditional write lost a race.
///
/// # Errors
///
/// Propagates the first error `op` returns, or `DatabaseError::Conflict`
/// once `max_attempts` attempts have all lost.
pub async fn retry_on_conflict<T, F, Fut>(
    config: &RetryConfig,
    what: &str,
    mut op: F,
) -> Result<T, DatabaseError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, DatabaseError>>,
{
    let attempts = config.max_attempts.max(1);
    for attempt in 1..=attempts {
        if let Some(done) = op(attempt).await? {
            return Ok(done);
        }
        tracing::debug!(what, attempt, "conditional update lost a race");
        if attempt < attempts {
            tokio::time::sleep(config.delay_after(attempt)).await;
        }
    }
    Err(DatabaseError::Conflict(format!(
        "{what}: gave up after {attempts} attempts"
    )))
}
