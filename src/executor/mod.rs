//! Query execution
//!
//! Layered bottom-up:
//! - [`cache`] clears a corpus cache ahead of a timed request
//! - [`timer`] times one query against one corpus
//! - [`Comparator`] times one query against every corpus, in order
//! - [`runner`] drives whole runs and writes their results

pub mod cache;
pub mod runner;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{cache_clear_url, CacheClearer};
pub use runner::RunExecutor;
pub use timer::ServerTimer;

use crate::{
    client::HttpClient,
    error::Result,
    logging::{Logger, LoggerFactory},
    models::{ComparisonResult, Corpus, Query, RunConfig},
};
use std::sync::Arc;
use std::time::Duration;

/// Times a query against each configured corpus, sequentially
pub struct Comparator {
    timer: ServerTimer,
    corpora: Vec<Corpus>,
    pause: Duration,
    logger: Logger,
}

impl Comparator {
    pub fn new(timer: ServerTimer, corpora: Vec<Corpus>, pause: Duration, logger: Logger) -> Self {
        Self {
            timer,
            corpora,
            pause,
            logger,
        }
    }

    pub fn from_config(client: Arc<dyn HttpClient>, config: &RunConfig, factory: &LoggerFactory) -> Self {
        let logger = factory.create_logger("COMPARE");
        let mut timer = ServerTimer::new(client, factory.create_network_logger());
        if config.clear_cache {
            logger.warn("Clearing caches before every request; servers must run in debug mode")
                .field("corpora", config.corpora.len())
                .log();
            timer = timer.with_cache_clearing();
        }
        Self::new(timer, config.corpora.clone(), config.pause(), logger)
    }

    pub fn corpora(&self) -> &[Corpus] {
        &self.corpora
    }

    /// Average seconds per corpus for `query`, in corpus order.
    ///
    /// Corpora are never queried concurrently so they do not compete for
    /// shared resources. The first failure ends the comparison.
    pub async fn compare(&self, query: &Query, repeat: u32) -> Result<ComparisonResult> {
        let mut result = ComparisonResult::new(query.pattern());

        for (index, corpus) in self.corpora.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let average = self.timer.time_query(corpus, repeat, query).await?;
            self.logger.info(&format!("{} on {}: {:.2}s", query.pattern(), corpus.url, average))
                .field("corpus", &corpus.url)
                .field("pattern", query.pattern())
                .field("average_s", average)
                .log();
            result.push_average(average);
        }

        Ok(result)
    }
}
