// src/lib.rs

//! # Pace Limiter
//!
//! A client-side sliding-window rate limiter with jittered pacing for
//! outbound HTTP requests.
//!
//! At most `request_limit` requests are sent within any trailing `window`.
//! Requests that are under the cap still wait a short random delay so they
//! do not go out in bursts.
//!
//! ## Quick Example
//!
//! ```no_run
//! use pace_limiter::{PaceLimiter, PaceLimiterConfig, ReqwestTransport, RequestOptions, SystemClock};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PaceLimiterConfig::new("https://inventory.example.com/api/v1")
//!     .window(Duration::from_secs(60))
//!     .request_limit(120);
//! let limiter = PaceLimiter::with_config(config, ReqwestTransport::default(), SystemClock)?;
//!
//! let response = limiter
//!     .get("/models", RequestOptions::new().query("search", "laptop"))
//!     .await?;
//! println!("status: {}", response.status());
//! # Ok(())
//! # }
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod jitter;
mod pace_limiter;
mod registry;
mod transport;
mod window;

// public API exports
pub use clock::{Clock, ClockError, MonotonicClock, SystemClock};
pub use config::{PaceLimiterConfig, TransportConfig};
pub use errors::{PaceLimiterError, RequestError};
pub use jitter::{Jitter, NoJitter, UniformJitter};
pub use pace_limiter::{Admission, PaceLimiter, combine_url};
pub use registry::LimiterRegistry;
pub use transport::{Body, Method, ReqwestTransport, RequestOptions, Transport};
pub use tokio_util::sync::CancellationToken;
