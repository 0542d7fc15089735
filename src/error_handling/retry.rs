//! Retry strategy configuration.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `RETRY_INITIAL_DELAY_MS` milliseconds
/// - Backoff factor: `RETRY_FACTOR`
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
/// - Maximum retries: `RETRY_MAX_ATTEMPTS`
///
/// The iterator yields one delay per retry, so a request is attempted at most
/// `RETRY_MAX_ATTEMPTS + 1` times.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_retry_strategy_initial_delay() {
        let first_delay = get_retry_strategy().next().unwrap();
        let expected_ms = crate::config::RETRY_INITIAL_DELAY_MS as u128;
        assert!(
            first_delay.as_millis() >= expected_ms,
            "Expected delay >= {}ms, got {}ms",
            expected_ms,
            first_delay.as_millis()
        );
    }

    #[test]
    fn test_get_retry_strategy_non_decreasing() {
        let delays: Vec<Duration> = get_retry_strategy().collect();
        for pair in delays.windows(2) {
            assert!(pair[1] >= pair[0], "Delay should not shrink: {:?}", pair);
        }
    }

    #[test]
    fn test_get_retry_strategy_max_delay() {
        let max_delay_ms = (crate::config::RETRY_MAX_DELAY_SECS * 1000) as u128;
        for delay in get_retry_strategy() {
            assert!(
                delay.as_millis() <= max_delay_ms,
                "Delay {}ms exceeds max {}ms",
                delay.as_millis(),
                max_delay_ms
            );
        }
    }

    #[test]
    fn test_get_retry_strategy_max_attempts() {
        assert_eq!(
            get_retry_strategy().count(),
            crate::config::RETRY_MAX_ATTEMPTS
        );
    }
}
