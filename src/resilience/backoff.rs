//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at `max`, plus up to 10% jitter.
pub fn calculate_backoff(attempt: u32, retries: &RetryConfig) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped = retries
        .base_delay_ms
        .saturating_mul(factor)
        .min(retries.max_delay_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retries(base_delay_ms: u64, max_delay_ms: u64) -> RetryConfig {
        RetryConfig {
            base_delay_ms,
            max_delay_ms,
            ..RetryConfig::default()
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = retries(100, 1000);
        assert_eq!(calculate_backoff(0, &config), Duration::ZERO);

        let first = calculate_backoff(1, &config).as_millis();
        assert!((100..110).contains(&first));

        let second = calculate_backoff(2, &config).as_millis();
        assert!((200..220).contains(&second));

        let capped = calculate_backoff(10, &config).as_millis();
        assert!((1000..1100).contains(&capped));
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let capped = calculate_backoff(u32::MAX, &retries(100, 500)).as_millis();
        assert!((500..550).contains(&capped));
    }
}
