//! In-memory HTTP client with scripted latencies

use crate::{
    client::{HttpClient, HttpRequest, HttpResponse},
    error::Result,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Replays scripted responses and records every request it sees
pub struct ScriptedClient {
    script: Mutex<VecDeque<(u16, Duration)>>,
    fallback: (u16, Duration),
    seen: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    /// Every request answers 200 after `latency`
    pub fn constant(latency: Duration) -> Self {
        Self::scripted(Vec::new(), (200, latency))
    }

    /// Answers from `script` in order, then from `fallback`
    pub fn scripted(script: Vec<(u16, Duration)>, fallback: (u16, Duration)) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Requests as `(method, url)` in arrival order
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, url_prefix: &str) -> usize {
        self.seen()
            .iter()
            .filter(|(m, u)| m == method && u.starts_with(url_prefix))
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.seen
            .lock()
            .unwrap()
            .push((request.method.to_string(), request.url.to_string()));

        let (status_code, elapsed) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        let body = if status_code >= 400 { "scripted failure" } else { "{}" };
        Ok(HttpResponse {
            status_code,
            body: body.to_string(),
            elapsed,
        })
    }
}
