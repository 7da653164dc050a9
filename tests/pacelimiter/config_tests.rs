// tests/pacelimiter/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::stub_transport::StubTransport;
    use crate::fixtures::test_clock::TestClock;
    use pace_limiter::{PaceLimiter, PaceLimiterConfig, PaceLimiterError};
    use std::time::Duration;

    const BASE_URL: &str = "https://inventory.example.com/api/v1";

    // Config validation tests
    #[test]
    fn config_rejects_zero_window() {
        let config = PaceLimiterConfig::new(BASE_URL).window(Duration::ZERO);
        let result = config.validate();
        assert!(matches!(result.unwrap_err(), PaceLimiterError::InvalidWindow));
    }

    #[test]
    fn config_rejects_window_beyond_nanosecond_range() {
        let config = PaceLimiterConfig::new(BASE_URL)
            .window(Duration::MAX)
            .request_limit(1);
        assert!(matches!(
            config.validate().unwrap_err(),
            PaceLimiterError::InvalidWindow
        ));

        let result = PaceLimiter::with_config(config, StubTransport::new(), TestClock::new(0.0));
        assert!(matches!(result.unwrap_err(), PaceLimiterError::InvalidWindow));
    }

    #[test]
    fn config_accepts_largest_nanosecond_window() {
        let config = PaceLimiterConfig::new(BASE_URL)
            .window(Duration::from_nanos(u64::MAX))
            .request_limit(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_request_limit() {
        let config = PaceLimiterConfig::new(BASE_URL).request_limit(0);
        let result = config.validate();
        assert!(matches!(
            result.unwrap_err(),
            PaceLimiterError::InvalidRequestLimit
        ));
    }

    #[test]
    fn config_rejects_empty_base_url() {
        let config = PaceLimiterConfig::new("");
        assert!(matches!(
            config.validate().unwrap_err(),
            PaceLimiterError::InvalidBaseUrl
        ));
    }

    #[test]
    fn config_accepts_limit_of_one() {
        let config = PaceLimiterConfig::new(BASE_URL)
            .window(Duration::from_millis(1))
            .request_limit(1);
        assert!(config.validate().is_ok());
    }

    // Test config builder pattern
    #[test]
    fn config_builder_pattern_works() {
        let config = PaceLimiterConfig::new("placeholder")
            .base_url(BASE_URL)
            .window(Duration::from_secs(10))
            .request_limit(5);

        assert!(config.validate().is_ok());

        let limiter =
            PaceLimiter::with_config(config, StubTransport::new(), TestClock::new(0.0)).unwrap();
        assert_eq!(limiter.base_url(), BASE_URL);
        assert_eq!(limiter.window(), Duration::from_secs(10));
        assert_eq!(limiter.request_limit(), 5);
        assert_eq!(limiter.config().ideal_interval(), Duration::from_secs(2));
    }

    // Constructor tests with config
    #[test]
    fn constructor_with_invalid_config_fails() {
        let config = PaceLimiterConfig::new(BASE_URL).request_limit(0);
        let result = PaceLimiter::with_config(config, StubTransport::new(), TestClock::new(0.0));
        assert!(matches!(
            result.unwrap_err(),
            PaceLimiterError::InvalidRequestLimit
        ));
    }

    #[tokio::test]
    async fn default_constructor_uses_sixty_seconds_and_120_requests() {
        let limiter = PaceLimiter::new(BASE_URL, StubTransport::new()).unwrap();
        assert_eq!(limiter.window(), Duration::from_secs(60));
        assert_eq!(limiter.request_limit(), 120);
        assert!(limiter.is_idle());
    }
}
