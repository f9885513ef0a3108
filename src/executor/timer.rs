//! Single-server query timing

use crate::{
    client::HttpClient,
    error::{AppError, Result},
    executor::cache::CacheClearer,
    logging::NetworkLogger,
    models::{Corpus, Query, TimingSample},
    stats::SampleSet,
};
use std::sync::Arc;

/// Times one query against one corpus
pub struct ServerTimer {
    client: Arc<dyn HttpClient>,
    cache_clearer: Option<CacheClearer>,
    logger: NetworkLogger,
}

impl ServerTimer {
    pub fn new(client: Arc<dyn HttpClient>, logger: NetworkLogger) -> Self {
        Self {
            client,
            cache_clearer: None,
            logger,
        }
    }

    /// Clear the corpus cache before every request
    pub fn with_cache_clearing(mut self) -> Self {
        self.cache_clearer = Some(CacheClearer::new(self.client.clone(), self.logger.clone()));
        self
    }

    /// Issue `repeat + 1` GETs and return the rounded mean of all but the first
    pub async fn time_query(&self, corpus: &Corpus, repeat: u32, query: &Query) -> Result<f64> {
        let url = query.hits_url(&corpus.url)?;
        let mut samples = SampleSet::default();

        for iteration in 0..=repeat {
            let warmup = iteration == 0;

            if let Some(clearer) = &self.cache_clearer {
                clearer.clear(corpus).await?;
            }

            let response = self.client.get(&url).await?;
            self.logger.log_http_request(
                url.as_str(),
                "GET",
                response.status_code,
                response.elapsed.as_secs_f64() * 1000.0,
                warmup,
            );

            if !response.is_success() {
                self.logger.log_http_failure(url.as_str(), response.status_code, &response.body);
                return Err(AppError::http_status(url.as_str(), response.status_code, response.body));
            }

            if !warmup {
                samples.push(TimingSample::from_duration(response.elapsed));
            }
        }

        if let Some(summary) = samples.summary() {
            self.logger.inner().debug(&format!("Timed {} against {}", query.pattern(), corpus.url))
                .field("corpus", &corpus.url)
                .field("pattern", query.pattern())
                .field("samples", summary.count)
                .field("mean_s", summary.mean)
                .field("min_s", summary.min)
                .field("max_s", summary.max)
                .field("std_dev_s", summary.std_dev)
                .log();
        }

        samples.average()
    }
}
