// src/clock.rs

// clock module definition and implementations

// dependencies
use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::time::Instant;

/// Clock trait to abstract time retrieval and waiting.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns the current time in nanoseconds as a u64.
/// The `sleep` method suspends the caller; it is the only place the
/// limiter ever waits, so a test clock can simulate waits without
/// real sleeps.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<u64, ClockError>;

    async fn sleep(&self, duration: Duration);
}

/// Clock error type
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("system time is before the Unix epoch")]
    SystemTimeError,
}

/// SystemClock implementation using the system time.
/// Returns the current time in nanoseconds since the Unix epoch.
/// Wall time can step backwards; prefer `MonotonicClock` unless
/// timestamps must line up with the calendar.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Result<u64, ClockError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .map_err(|_| ClockError::SystemTimeError)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// MonotonicClock counts nanoseconds since it was created.
/// Reads tokio's `Instant`, so it follows a paused runtime clock in tests.
/// This is the default clock used by the PaceLimiter.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for MonotonicClock {
    fn now(&self) -> Result<u64, ClockError> {
        Ok(self.origin.elapsed().as_nanos() as u64)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
