// src/errors.rs

// error handling for the pace limiter type

// dependencies
use thiserror::Error;

use crate::clock::ClockError;

/// Error type for PaceLimiter configuration and admission issues.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PaceLimiterError {
    #[error("Window must be longer than zero and fit in u64 nanoseconds")]
    InvalidWindow,
    #[error("Request limit must be at least 1")]
    InvalidRequestLimit,
    #[error("Base URL must not be empty")]
    InvalidBaseUrl,
    #[error("Invalid header `{0}`")]
    InvalidHeader(String),
    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Clock error occurred: {0}")]
    Clock(#[from] ClockError),
    #[error("Request cancelled while waiting for admission")]
    Cancelled,
}

impl PaceLimiterError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PaceLimiterError::Cancelled)
    }
}

/// Error returned by the request methods of a limiter.
///
/// `Transport` carries the transport's own error exactly as it was
/// returned; the limiter never inspects or rewrites it.
#[derive(Debug, Error)]
pub enum RequestError<E> {
    #[error(transparent)]
    Admission(#[from] PaceLimiterError),
    #[error(transparent)]
    Transport(E),
}

impl<E> RequestError<E> {
    /// The transport error, if the request got as far as the transport.
    pub fn into_transport(self) -> Option<E> {
        match self {
            RequestError::Transport(e) => Some(e),
            RequestError::Admission(_) => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestError::Admission(e) if e.is_cancelled())
    }
}
