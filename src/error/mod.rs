//! Error handling for perfcompare
//!
//! Every failure aborts the comparison session: there is no retry and no
//! per-query isolation. The variants only decide how the failure is reported
//! and which exit code the process ends with.

use thiserror::Error;

/// Custom error types for perfcompare
#[derive(Error, Debug)]
pub enum AppError {
    /// Command line misuse (missing config path, conflicting flags)
    #[error("Usage error: {0}")]
    Usage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (reading the config file, writing output)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (JSON, URLs, numbers)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// A search request came back with a non-success status
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Clearing a corpus cache failed
    #[error("Cache clear error: {0}")]
    CacheClear(String),

    /// Averaging errors
    #[error("Statistics error: {0}")]
    Statistics(String),
}

impl AppError {
    /// Create a new usage error
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage(message.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new HTTP status error
    pub fn http_status<U: Into<String>, B: Into<String>>(url: U, status: u16, body: B) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a new cache clear error
    pub fn cache_clear<S: Into<String>>(message: S) -> Self {
        Self::CacheClear(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Usage(_) => "USAGE",
            Self::Config(_) => "CONFIG",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Network(_) => "NETWORK",
            Self::HttpStatus { .. } => "HTTP",
            Self::CacheClear(_) => "CACHE",
            Self::Statistics(_) => "STATS",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Config(_) | Self::Parse(_) => 1,
            Self::Network(_) | Self::HttpStatus { .. } | Self::CacheClear(_) => 2,
            Self::Io(_) => 5,
            Self::Statistics(_) => 6,
        }
    }

    /// Short operator hint printed after the error itself
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Usage(_) => Some("Run with --help to see the expected arguments."),
            Self::Config(_) | Self::Parse(_) => {
                Some("Check the config file: it needs \"corpora\", \"repeat\" and \"runs\", and each run needs \"words\" or \"patts\".")
            }
            Self::Network(_) => Some("Check that every corpus URL is reachable from this machine."),
            Self::HttpStatus { .. } => Some("The server rejected the query; check the run's fixed parameters and pattern syntax."),
            Self::CacheClear(_) => {
                Some("Cache clearing usually requires the server to run in debug mode, or set an explicit \"cache_clear\" endpoint.")
            }
            _ => None,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Usage(_) | Self::Config(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Network(_) | Self::HttpStatus { .. } | Self::CacheClear(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Statistics(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Error conversions used with `?`
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for the final failure printed by the binary
pub struct ErrorReporter {
    pub use_color: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Render the report as it is written to stderr
    pub fn render(&self, error: &AppError) -> String {
        let mut out = format!("Error: {}", error.format_for_console(self.use_color));
        if let Some(hint) = error.hint() {
            out.push_str("\n\n");
            out.push_str(hint);
        }
        out
    }

    /// Report an error to the operator
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true)
    }
}
