// src/jitter.rs

//! Pacing strategies applied between requests that are under the hard cap

// dependencies
use crate::config::PaceLimiterConfig;
use rand::Rng;
use std::time::Duration;

/// Produces the extra delay a caller waits when the hard cap was not hit.
/// Any `Fn(&PaceLimiterConfig) -> Duration` closure is a `Jitter`.
pub trait Jitter: Send + Sync {
    fn delay(&self, config: &PaceLimiterConfig) -> Duration;
}

impl<F> Jitter for F
where
    F: Fn(&PaceLimiterConfig) -> Duration + Send + Sync,
{
    fn delay(&self, config: &PaceLimiterConfig) -> Duration {
        self(config)
    }
}

/// Default pacing: uniform draw from `[ideal / 2, 3 * ideal / 2)`
/// where `ideal = window / request_limit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformJitter;

impl UniformJitter {
    /// Bounds of the draw as `(inclusive minimum, exclusive maximum)`
    pub fn bounds(config: &PaceLimiterConfig) -> (Duration, Duration) {
        let minimum = config.ideal_interval() / 2;
        (minimum, minimum.checked_mul(3).unwrap_or(Duration::MAX))
    }
}

impl Jitter for UniformJitter {
    fn delay(&self, config: &PaceLimiterConfig) -> Duration {
        let (minimum, maximum) = Self::bounds(config);
        let min_nanos = u64::try_from(minimum.as_nanos()).unwrap_or(u64::MAX);
        let max_nanos = u64::try_from(maximum.as_nanos()).unwrap_or(u64::MAX);
        if min_nanos >= max_nanos {
            return Duration::from_nanos(min_nanos);
        }
        Duration::from_nanos(rand::rng().random_range(min_nanos..max_nanos))
    }
}

/// No pacing; only the hard cap applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn delay(&self, _config: &PaceLimiterConfig) -> Duration {
        Duration::ZERO
    }
}
