//! Main application orchestration and execution

use crate::{
    cli::Cli,
    client::{HttpClient, NetworkClient},
    config::load_config,
    error::Result,
    executor::{Comparator, RunExecutor},
    logging::LoggerFactory,
    models::RunConfig,
    output::OutputCoordinator,
};
use std::io::Write;
use std::sync::Arc;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the configuration and run every comparison, writing results to stdout
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli)?;

        let client: Arc<dyn HttpClient> = match config.timeout() {
            Some(timeout) => Arc::new(NetworkClient::with_timeout(timeout)?),
            None => Arc::new(NetworkClient::new()?),
        };

        let stdout = std::io::stdout();
        run_comparison(&config, client, stdout.lock()).await
    }
}

/// Execute every configured run against `client`, streaming results to `out`
pub async fn run_comparison<W: Write>(config: &RunConfig, client: Arc<dyn HttpClient>, out: W) -> Result<()> {
    let factory = LoggerFactory::new(config);
    let logger = factory.create_logger("APP");

    logger.info(&format!("{} v{}", crate::PKG_NAME, crate::VERSION))
        .field("session", factory.session_id())
        .field("corpora", config.corpora.len())
        .field("runs", config.runs.len())
        .field("clear_cache", config.clear_cache)
        .log();

    let comparator = Comparator::from_config(client, config, &factory);
    let mut executor = RunExecutor::new(comparator, OutputCoordinator::tsv(out), factory.create_logger("RUN"));

    if let Err(e) = executor.execute_all(config).await {
        logger.error("Comparison aborted").error_info(&e).log();
        return Err(e);
    }

    logger.info("Comparison finished").log();
    Ok(())
}
