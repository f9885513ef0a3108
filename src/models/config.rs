//! Run configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Environment variables that override values from the config file
pub const ENV_REPEAT: &str = "PERFCOMPARE_REPEAT";
pub const ENV_PAUSE_MS: &str = "PERFCOMPARE_PAUSE_MS";
pub const ENV_CLEAR_CACHE: &str = "PERFCOMPARE_CLEAR_CACHE";

/// Top-level comparison configuration, as read from the JSON config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Search-server base URLs, compared in this order
    pub corpora: Vec<Corpus>,

    /// Timed repetitions per query, unless a run overrides it
    pub repeat: u32,

    /// Comparison runs, executed in this order
    pub runs: Vec<Run>,

    /// Courtesy pause between corpora, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Clear each corpus cache before every request
    #[serde(default)]
    pub clear_cache: bool,

    /// Per-request timeout; no timeout when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Enable colored diagnostics
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose diagnostics
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug diagnostics
    #[serde(default)]
    pub debug: bool,

    /// Diagnostic line format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl RunConfig {
    /// Repetition count a run is timed with
    pub fn effective_repeat(&self, run: &Run) -> u32 {
        run.repeat.unwrap_or(self.repeat)
    }

    /// Courtesy pause between corpora
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Per-request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.corpora.is_empty() {
            return Err(AppError::config("At least one corpus URL is required"));
        }

        for corpus in &self.corpora {
            corpus.validate()?;
        }

        if self.runs.is_empty() {
            return Err(AppError::config("At least one run is required"));
        }

        for (index, run) in self.runs.iter().enumerate() {
            if run.terms.is_empty() {
                return Err(AppError::config(format!(
                    "Run {} has an empty \"{}\" list",
                    index + 1,
                    run.terms.key()
                )));
            }
            // Averaging zero timed samples is undefined
            if self.effective_repeat(run) == 0 {
                return Err(AppError::config(format!(
                    "Run {} has repeat 0; at least one timed request per query is required",
                    index + 1
                )));
            }
        }

        if self.timeout_seconds == Some(0) {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Merge override values provided by `lookup` (normally the process
    /// environment) into this configuration
    pub fn merge_from_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(repeat) = lookup(ENV_REPEAT) {
            self.repeat = repeat.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_REPEAT, repeat, e)))?;
        }

        if let Some(pause) = lookup(ENV_PAUSE_MS) {
            self.pause_ms = pause.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_PAUSE_MS, pause, e)))?;
        }

        if let Some(clear) = lookup(ENV_CLEAR_CACHE) {
            self.clear_cache = clear.trim().to_lowercase().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_CLEAR_CACHE, clear, e)))?;
        }

        Ok(())
    }
}

fn default_pause_ms() -> u64 {
    crate::defaults::DEFAULT_PAUSE_MS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

/// One search server under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CorpusSpec", into = "CorpusSpec")]
pub struct Corpus {
    /// Base URL of the corpus, e.g. `http://host/blacklab-server/opensonar`
    pub url: String,
    /// Explicit cache-clear endpoint; derived from `url` when absent
    pub cache_clear: Option<String>,
}

impl Corpus {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            cache_clear: None,
        }
    }

    fn validate(&self) -> Result<()> {
        check_http_url(&self.url, "corpus URL")?;
        if let Some(endpoint) = &self.cache_clear {
            check_http_url(endpoint, "cache-clear endpoint")?;
        }
        Ok(())
    }
}

fn check_http_url(raw: &str, what: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(AppError::config(format!("{} cannot be empty", what)));
    }
    let parsed = url::Url::parse(raw)
        .map_err(|e| AppError::config(format!("Invalid {} '{}': {}", what, raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::config(format!(
            "Unsupported scheme '{}' in {} '{}'",
            scheme, what, raw
        ))),
    }
}

/// Wire form of a corpus: a bare URL string or an object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CorpusSpec {
    Url(String),
    Detailed {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_clear: Option<String>,
    },
}

impl From<CorpusSpec> for Corpus {
    fn from(spec: CorpusSpec) -> Self {
        match spec {
            CorpusSpec::Url(url) => Corpus { url, cache_clear: None },
            CorpusSpec::Detailed { url, cache_clear } => Corpus { url, cache_clear },
        }
    }
}

impl From<Corpus> for CorpusSpec {
    fn from(corpus: Corpus) -> Self {
        match corpus.cache_clear {
            None => CorpusSpec::Url(corpus.url),
            Some(cache_clear) => CorpusSpec::Detailed {
                url: corpus.url,
                cache_clear: Some(cache_clear),
            },
        }
    }
}

/// The variable part of a run
#[derive(Debug, Clone, PartialEq)]
pub enum TermList {
    /// Literal words, each searched as an exact-phrase pattern
    Words(Vec<String>),
    /// Query patterns used verbatim
    Patterns(Vec<String>),
}

impl TermList {
    pub fn len(&self) -> usize {
        match self {
            TermList::Words(words) => words.len(),
            TermList::Patterns(patts) => patts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Config file key this list came from
    pub fn key(&self) -> &'static str {
        match self {
            TermList::Words(_) => "words",
            TermList::Patterns(_) => "patts",
        }
    }

    /// Query patterns in list order
    pub fn patterns(&self) -> Vec<String> {
        match self {
            TermList::Words(words) => words.iter().map(|w| format!("\"{}\"", w)).collect(),
            TermList::Patterns(patts) => patts.clone(),
        }
    }
}

/// A scalar query parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Flag(b) => write!(f, "{}", b),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl TryFrom<serde_json::Value> for ParamValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, Self::Error> {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Ok(ParamValue::Flag(b)),
            Value::Number(n) => Ok(ParamValue::Number(n)),
            Value::String(s) => Ok(ParamValue::Text(s)),
            Value::Null => Err("null is not a query parameter value".to_string()),
            Value::Array(_) => Err("a list is not a query parameter value".to_string()),
            Value::Object(_) => Err("an object is not a query parameter value".to_string()),
        }
    }
}

/// One batch of comparison queries sharing fixed parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRun", into = "RawRun")]
pub struct Run {
    /// Fixed query parameters (group, usecache, ...)
    pub params: BTreeMap<String, ParamValue>,
    /// Words or patterns, one query each
    pub terms: TermList,
    /// Overrides the global repeat count
    pub repeat: Option<u32>,
}

impl Run {
    pub fn words<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            params: BTreeMap::new(),
            terms: TermList::Words(words.into_iter().map(Into::into).collect()),
            repeat: None,
        }
    }

    pub fn patterns<S: Into<String>>(patts: impl IntoIterator<Item = S>) -> Self {
        Self {
            params: BTreeMap::new(),
            terms: TermList::Patterns(patts.into_iter().map(Into::into).collect()),
            repeat: None,
        }
    }

    pub fn with_param<K: Into<String>>(mut self, key: K, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Human-readable description of the fixed parameters
    pub fn describe_params(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Wire form of a run: fixed params share the object with the term list
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    patts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repeat: Option<u32>,
    #[serde(flatten)]
    params: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawRun> for Run {
    type Error = String;

    fn try_from(raw: RawRun) -> std::result::Result<Self, Self::Error> {
        let mut run = match (raw.words, raw.patts) {
            (Some(words), None) => Run::words(words),
            (None, Some(patts)) => Run::patterns(patts),
            (Some(_), Some(_)) => return Err("a run cannot have both \"words\" and \"patts\"".to_string()),
            (None, None) => return Err("a run needs either \"words\" or \"patts\"".to_string()),
        };

        for (key, value) in raw.params {
            let value = ParamValue::try_from(value)
                .map_err(|e| format!("run parameter \"{}\": {}", key, e))?;
            run = run.with_param(key, value);
        }

        if let Some(repeat) = raw.repeat {
            run = run.with_repeat(repeat);
        }

        Ok(run)
    }
}

impl From<Run> for RawRun {
    fn from(run: Run) -> Self {
        let (words, patts) = match run.terms {
            TermList::Words(words) => (Some(words), None),
            TermList::Patterns(patts) => (None, Some(patts)),
        };
        let params = run
            .params
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    ParamValue::Flag(b) => serde_json::Value::Bool(b),
                    ParamValue::Number(n) => serde_json::Value::Number(n),
                    ParamValue::Text(s) => serde_json::Value::String(s),
                };
                (k, value)
            })
            .collect();
        RawRun {
            words,
            patts,
            repeat: run.repeat,
            params,
        }
    }
}
