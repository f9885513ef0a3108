//! Data models and structures for perfcompare

pub mod config;
pub mod metrics;
pub mod query;

// Re-export main model types
pub use config::{Corpus, ParamValue, Run, RunConfig, TermList};
pub use metrics::{ComparisonResult, TimingSample};
pub use query::Query;
