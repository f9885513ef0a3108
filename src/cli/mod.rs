//! Command-line interface

use crate::{config::EnvManager, logging::LogFormat};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Compare search-server query latency across corpora
#[derive(Parser, Debug, Clone)]
#[command(name = "perfcompare")]
#[command(version, about, long_about = None)]
#[command(after_help = EnvManager::display_env_help())]
pub struct Cli {
    /// JSON run configuration
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the global repeat count
    #[arg(short, long, value_name = "N")]
    pub repeat: Option<u32>,

    /// Courtesy pause between corpora, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pause_ms: Option<u64>,

    /// Clear each corpus cache before every request
    #[arg(long)]
    pub clear_cache: bool,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS", value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose diagnostics
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug diagnostics
    #[arg(long)]
    pub debug: bool,

    /// Diagnostic line format (console, json, compact)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Validate CLI arguments clap cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.config.is_none() {
            return Err("Missing path to the run configuration file".to_string());
        }

        if self.repeat == Some(0) {
            return Err("--repeat must be at least 1".to_string());
        }

        Ok(())
    }

    /// Usage text printed when the arguments are unusable
    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse timeout seconds
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 3600 {
                Err("Duration cannot exceed 3600 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(["perfcompare", "runs.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("runs.json")));
        assert_eq!(cli.repeat, None);
        assert_eq!(cli.timeout, None);
        assert!(!cli.clear_cache);
        assert!(!cli.verbose);
        assert!(!cli.debug);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "perfcompare",
            "-r", "7",
            "--pause-ms", "250",
            "--clear-cache",
            "--timeout", "30",
            "--no-color",
            "--verbose",
            "--debug",
            "--log-format", "json",
            "runs.json",
        ]);

        assert_eq!(cli.repeat, Some(7));
        assert_eq!(cli.pause_ms, Some(250));
        assert!(cli.clear_cache);
        assert_eq!(cli.timeout, Some(30));
        assert!(cli.no_color);
        assert!(!cli.use_colors());
        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_missing_config_fails_validation() {
        let cli = Cli::parse_from(["perfcompare"]);
        let error = cli.validate().unwrap_err();
        assert!(error.contains("run configuration"));
        assert!(Cli::usage().contains("perfcompare"));
    }

    #[test]
    fn test_help_documents_environment_variables() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("PERFCOMPARE_REPEAT"));
        assert!(help.contains("PERFCOMPARE_CLEAR_CACHE"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let cli = Cli::parse_from(["perfcompare", "--repeat", "0", "runs.json"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_bad_values_rejected_by_clap() {
        assert!(Cli::try_parse_from(["perfcompare", "--timeout", "0", "x"]).is_err());
        assert!(Cli::try_parse_from(["perfcompare", "--repeat", "-1", "x"]).is_err());
        assert!(Cli::try_parse_from(["perfcompare", "--log-format", "xml", "x"]).is_err());
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(parse_duration("10").unwrap(), 10);
        assert_eq!(parse_duration("3600").unwrap(), 3600);

        assert!(parse_duration("0").is_err());
        assert!(parse_duration("3601").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("+5").is_err());
        assert!(parse_duration("0x10").is_err());
    }
}
