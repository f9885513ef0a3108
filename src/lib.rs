//! perfcompare
//!
//! Issues search queries against one or more search-server corpora, times
//! each round trip, and prints per-corpus averages as tab-separated lines.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{ComparisonResult, Corpus, Query, Run, RunConfig, TermList};
pub use output::{OutputCoordinator, OutputFormatter, TsvFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_PAUSE_MS: u64 = 0;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
