//! Environment variable handling and .env file management

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::config::{ENV_CLEAR_CACHE, ENV_PAUSE_MS, ENV_REPEAT},
};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load an environment file if it exists.
    ///
    /// Variables already set in the process environment are left alone.
    pub fn load_env_file_from(path: &Path, logger: &Logger) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
            logger.debug("Loaded environment file")
                .field("path", path.display().to_string())
                .log();
        } else {
            logger.debug("No environment file found")
                .field("path", path.display().to_string())
                .log();
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            ENV_REPEAT => {
                let repeat: u32 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if repeat == 0 {
                    return Err(AppError::config(format!("{} must be at least 1", key)));
                }
            }
            ENV_PAUSE_MS => {
                value.trim().parse::<u64>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            ENV_CLEAR_CACHE => {
                value.trim().to_lowercase().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported variables as `(name, description, example)`
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (ENV_REPEAT, "Global repeat count (at least 1)", "5"),
            (ENV_PAUSE_MS, "Pause between corpora in milliseconds", "500"),
            (ENV_CLEAR_CACHE, "Clear corpus caches before every request", "true"),
        ]
    }

    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<24} {}\n", var, description));
            help.push_str(&format!("  {:<24} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Config file values\n");

        help
    }

    /// Check every supported variable `lookup` knows about; the first bad value fails
    pub fn validate_vars<F>(lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, _, _) in Self::get_supported_env_vars() {
            if let Some(value) = lookup(name) {
                Self::validate_env_var(name, &value)?;
            }
        }
        Ok(())
    }
}
