//! Configuration loading: JSON file, `.env`, environment, then CLI flags

pub mod env;
pub mod parser;

pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};

pub use crate::models::RunConfig;
