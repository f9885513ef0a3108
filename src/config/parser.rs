//! Configuration parsing from the config file, environment and CLI arguments

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    logging::{LogLevel, Logger},
    models::RunConfig,
};
use std::path::{Path, PathBuf};

/// Source of environment variable values
type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Builds the effective run configuration from every layer
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
    env_lookup: EnvLookup,
    logger: Logger,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        let mut logger = Logger::new("CONFIG".to_string());
        if cli.debug {
            logger.set_level(LogLevel::Debug);
        } else if cli.verbose {
            logger.set_level(LogLevel::Info);
        }
        logger.set_color(cli.use_colors());
        if let Some(format) = cli.log_format {
            logger.set_format(format);
        }

        Self {
            cli,
            env_file: PathBuf::from(".env"),
            env_lookup: Box::new(|name| std::env::var(name).ok()),
            logger,
        }
    }

    /// Read the `.env` layer from another path
    #[cfg(test)]
    pub(crate) fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = path.into();
        self
    }

    /// Read environment overrides through `lookup` instead of the process environment
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<RunConfig> {
        let path = self.cli.config.as_deref()
            .ok_or_else(|| AppError::usage("Missing path to the run configuration file"))?;

        let mut config = Self::read_file(path)?;

        EnvManager::load_env_file_from(&self.env_file, &self.logger)?;
        EnvManager::validate_vars(&self.env_lookup)?;
        config.merge_from_vars(&self.env_lookup)?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        self.logger.debug("Effective configuration")
            .field("summary", display_config_summary(&config))
            .log();

        Ok(config)
    }

    /// Deserialize a run configuration file
    pub fn read_file(path: &Path) -> Result<RunConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("Cannot read config file {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::parse(format!("Invalid config file {}: {}", path.display(), e)))
    }

    fn apply_cli_overrides(&self, config: &mut RunConfig) {
        if let Some(repeat) = self.cli.repeat {
            config.repeat = repeat;
        }

        if let Some(pause_ms) = self.cli.pause_ms {
            config.pause_ms = pause_ms;
        }

        if self.cli.clear_cache {
            config.clear_cache = true;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = Some(timeout);
        }

        if let Some(format) = self.cli.log_format {
            config.log_format = format;
        }

        if !self.cli.use_colors() {
            config.enable_color = false;
        }

        // flags can only switch diagnostics on
        config.verbose |= self.cli.verbose;
        config.debug |= self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<RunConfig> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &RunConfig) -> String {
    let mut summary = Vec::new();

    let corpora: Vec<&str> = config.corpora.iter().map(|c| c.url.as_str()).collect();
    summary.push(format!("Corpora: {}", corpora.join(", ")));
    summary.push(format!("Runs: {}", config.runs.len()));
    summary.push(format!("Repeat: {}", config.repeat));
    summary.push(format!("Pause: {}ms", config.pause_ms));
    summary.push(format!("Clear cache: {}", config.clear_cache));
    match config.timeout_seconds {
        Some(secs) => summary.push(format!("Timeout: {}s", secs)),
        None => summary.push("Timeout: none".to_string()),
    }
    summary.push(format!("Color Output: {}", config.enable_color));

    summary.join("\n")
}
