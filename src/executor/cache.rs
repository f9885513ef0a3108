//! Server-side result cache invalidation

use crate::{
    client::HttpClient,
    error::{AppError, Result},
    logging::NetworkLogger,
    models::Corpus,
};
use std::sync::Arc;
use url::Url;

/// Resource that replaces the corpus name when deriving the endpoint
pub const CACHE_CLEAR_RESOURCE: &str = "cache-clear";

/// Cache-clear endpoint for a corpus
///
/// An explicit endpoint wins. Otherwise the last path segment of the corpus
/// URL is replaced, so `http://h/blacklab-server/corpus` becomes
/// `http://h/blacklab-server/cache-clear`.
pub fn cache_clear_url(corpus: &Corpus) -> Result<Url> {
    if let Some(endpoint) = &corpus.cache_clear {
        return Url::parse(endpoint)
            .map_err(|e| AppError::config(format!("Invalid cache-clear endpoint '{}': {}", endpoint, e)));
    }

    let mut url = Url::parse(&corpus.url)
        .map_err(|e| AppError::config(format!("Invalid corpus URL '{}': {}", corpus.url, e)))?;
    url.set_query(None);
    url.set_fragment(None);

    let has_segment = url
        .path_segments()
        .map(|mut segments| segments.any(|s| !s.is_empty()))
        .unwrap_or(false);
    if !has_segment {
        return Err(AppError::config(format!(
            "Cannot derive a cache-clear endpoint from '{}': it has no path segment to replace",
            corpus.url
        )));
    }

    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("Corpus URL '{}' cannot have a path", corpus.url)))?
        .pop_if_empty()
        .pop()
        .push(CACHE_CLEAR_RESOURCE);

    Ok(url)
}

/// Clears a corpus cache before a timed request
pub struct CacheClearer {
    client: Arc<dyn HttpClient>,
    logger: NetworkLogger,
}

impl CacheClearer {
    pub fn new(client: Arc<dyn HttpClient>, logger: NetworkLogger) -> Self {
        Self { client, logger }
    }

    /// POST to the cache-clear endpoint; any failure ends the session
    pub async fn clear(&self, corpus: &Corpus) -> Result<()> {
        let url = cache_clear_url(corpus)?;

        let response = match self.client.post(&url).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.inner().error(&format!("Cache clear failed for {}", url))
                    .field("url", url.as_str())
                    .error_info(&e)
                    .log();
                return Err(AppError::cache_clear(format!("{}: {}", url, e)));
            }
        };

        self.logger.log_http_request(
            url.as_str(),
            "POST",
            response.status_code,
            response.elapsed.as_secs_f64() * 1000.0,
            false,
        );

        if !response.is_success() {
            self.logger.log_http_failure(url.as_str(), response.status_code, &response.body);
            return Err(AppError::cache_clear(format!(
                "{} returned HTTP {}: {}",
                url, response.status_code, response.body
            )));
        }

        Ok(())
    }
}
