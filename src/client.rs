//! HTTP client implementation and timing measurements

#[cfg(test)]
mod integration_tests;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use std::time::{Duration, Instant};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("perfcompare/", env!("CARGO_PKG_VERSION"));

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request, timing the full round trip
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute a GET request
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.execute_request(HttpRequest::get(url.clone())).await
    }

    /// Execute a POST request without a body
    async fn post(&self, url: &Url) -> Result<HttpResponse> {
        self.execute_request(HttpRequest::post(url.clone())).await
    }
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub method: Method,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(url: Url, method: Method) -> Self {
        Self { url, method }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new(url, Method::GET)
    }

    /// Create a POST request
    pub fn post(url: Url) -> Self {
        Self::new(url, Method::POST)
    }
}

/// HTTP response with timing information
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    /// Response body, lossily decoded; kept for error diagnostics
    pub body: String,
    /// From sending the request until the body was fully read
    pub elapsed: Duration,
}

impl HttpResponse {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

/// reqwest-backed client; one connection pool for the whole session
pub struct NetworkClient {
    client: Client,
}

impl NetworkClient {
    /// Create a new network client without a request timeout
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// Create a new network client with a request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for NetworkClient {
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let start = Instant::now();

        let response = self
            .client
            .request(request.method, request.url.clone())
            .send()
            .await
            .map_err(|e| AppError::network(format!("Request to {} failed: {}", request.url, e)))?;

        let status_code = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::network(format!("Failed to read response body from {}: {}", request.url, e)))?;

        let elapsed = start.elapsed();

        Ok(HttpResponse {
            status_code,
            body: String::from_utf8_lossy(&body).into_owned(),
            elapsed,
        })
    }
}
