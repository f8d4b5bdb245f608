use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::exponential(3, Duration::from_secs(1))
    }
}

impl RetryConfig {
    /// Waits `base`, `2 * base`, `4 * base`, ... between attempts.
    pub fn exponential(max_attempts: usize, base: Duration) -> Self {
        Self {
            max_attempts,
            base_backoff: base,
            max_backoff: base * 16,
        }
    }

    /// Delay slept after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: usize) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        std::cmp::min(self.base_backoff * factor, self.max_backoff)
    }
}

/// Runs `f` until it succeeds, `should_retry` rejects the error, or
/// `max_attempts` is reached. The closure receives the 1-based attempt number.
pub async fn retry_async_with_config<F, Fut, T, E, P>(
    config: RetryConfig,
    should_retry: P,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut(usize) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= config.max_attempts || !should_retry(&e) {
                    return Err(e);
                }

                tokio::time::sleep(config.backoff_after(attempt)).await;
            }
        }
    }
}
