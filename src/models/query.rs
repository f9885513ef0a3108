//! A single search request: fixed run parameters plus one pattern

use crate::error::{AppError, Result};
use crate::models::config::ParamValue;
use std::collections::BTreeMap;
use url::Url;

/// Query parameter that carries the search pattern
pub const PATTERN_PARAM: &str = "patt";

/// Search resource appended to a corpus URL
pub const HITS_RESOURCE: &str = "hits";

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pattern: String,
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Merge fixed parameters with one pattern; the pattern wins over a fixed `patt`
    pub fn new<S: Into<String>>(params: &BTreeMap<String, ParamValue>, pattern: S) -> Self {
        let pattern = pattern.into();
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| key.as_str() != PATTERN_PARAM)
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        pairs.push((PATTERN_PARAM.to_string(), pattern.clone()));
        Self { pattern, pairs }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// `<corpus>/hits?<form-encoded params>`; a query already on the corpus URL is kept
    pub fn hits_url(&self, corpus_url: &str) -> Result<Url> {
        let mut url = Url::parse(corpus_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("Corpus URL '{}' cannot have a path", corpus_url)))?
            .pop_if_empty()
            .push(HITS_RESOURCE);
        url.query_pairs_mut().extend_pairs(self.pairs());
        Ok(url)
    }
}
