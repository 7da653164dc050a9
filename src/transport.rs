// src/transport.rs

//! The HTTP capability the limiter forwards admitted requests to

// dependencies
use crate::config::TransportConfig;
use crate::errors::PaceLimiterError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
pub use reqwest::Method;
use std::time::Duration;

/// Performs one HTTP request. The limiter hands over the verb, the full
/// URL and the caller's options untouched, and returns whatever comes back.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Self::Response, Self::Error>;
}

/// Request body forwarded to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

/// Per-request arguments: headers, query parameters, body and timeout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(Body::Json(value));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(Body::Text(text.into()));
        self
    }

    pub fn bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Bytes(bytes.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Transport backed by a `reqwest::Client`.
/// Status codes are not checked; a 4xx or 5xx is still `Ok(response)`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client that sends the configured headers, token and timeout
    /// with every request
    pub fn from_config(config: &TransportConfig) -> Result<Self, PaceLimiterError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| PaceLimiterError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| PaceLimiterError::InvalidHeader(name.as_str().to_string()))?;
            headers.append(name, value);
        }
        if let Some(token) = &config.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| PaceLimiterError::InvalidHeader(AUTHORIZATION.as_str().to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Ok(Self::new(builder.build()?))
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    async fn send(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Self::Response, Self::Error> {
        let mut builder = self.client.request(method, url);
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match options.body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Text(text)) => builder.body(text),
            Some(Body::Bytes(bytes)) => builder.body(bytes),
            None => builder,
        };
        builder.send().await
    }
}
