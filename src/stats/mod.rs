//! Averaging of timed samples
//!
//! Samples are recorded per corpus and per query. The warmup request never
//! reaches a [`SampleSet`]; everything pushed here counts towards the mean.

use crate::{
    error::{AppError, Result},
    models::metrics::TimingSample,
};
use serde::{Deserialize, Serialize};

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Timed samples for one query against one corpus
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    samples: Vec<TimingSample>,
}

impl SampleSet {
    pub fn push(&mut self, sample: TimingSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of all samples rounded to two decimals; fails on an empty set
    pub fn average(&self) -> Result<f64> {
        let values: Vec<f64> = self.samples.iter().map(|s| s.seconds).collect();
        mean(&values)
            .map(round2)
            .ok_or_else(|| AppError::statistics("Cannot average zero timed samples (repeat must be at least 1)"))
    }

    /// Min/max/spread summary for diagnostics
    pub fn summary(&self) -> Option<SampleSummary> {
        let values: Vec<f64> = self.samples.iter().map(|s| s.seconds).collect();
        let avg = mean(&values)?;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some(SampleSummary {
            count: values.len(),
            mean: round2(avg),
            min,
            max,
            std_dev: standard_deviation(&values, avg),
        })
    }
}

/// Sample standard deviation
fn standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values.iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Spread of a sample set, logged at debug level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}
