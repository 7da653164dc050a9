// tests/pacelimiter/fixtures/stub_transport.rs

// dependencies
use async_trait::async_trait;
use pace_limiter::{Method, RequestOptions, Transport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: Method,
    pub url: String,
    pub options: RequestOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    pub status: u16,
    pub url: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("connection refused: {url}")]
pub struct StubError {
    pub url: String,
}

// Records every request; answers 200, or fails when told to
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    sent: Arc<Mutex<Vec<SentRequest>>>,
    failing: Arc<AtomicBool>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let transport = Self::default();
        transport.failing.store(true, Ordering::Relaxed);
        transport
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    type Response = StubResponse;
    type Error = StubError;

    async fn send(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<StubResponse, StubError> {
        self.sent.lock().unwrap().push(SentRequest {
            method,
            url: url.to_string(),
            options,
        });
        if self.failing.load(Ordering::Relaxed) {
            Err(StubError {
                url: url.to_string(),
            })
        } else {
            Ok(StubResponse {
                status: 200,
                url: url.to_string(),
            })
        }
    }
}
