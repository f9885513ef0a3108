//! Timing samples and comparison results

use crate::stats::round2;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Elapsed seconds of one HTTP round trip, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSample {
    pub seconds: f64,
}

impl TimingSample {
    pub fn from_duration(elapsed: Duration) -> Self {
        Self {
            seconds: round2(elapsed.as_secs_f64()),
        }
    }
}

/// Per-corpus averages for one query term, in corpus-list order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The literal pattern that was searched
    pub term: String,
    /// Average seconds per corpus
    pub averages: Vec<f64>,
}

impl ComparisonResult {
    pub fn new<S: Into<String>>(term: S) -> Self {
        Self {
            term: term.into(),
            averages: Vec::new(),
        }
    }

    pub fn push_average(&mut self, average: f64) {
        self.averages.push(average);
    }

    /// Index of the fastest corpus, first one wins ties
    pub fn fastest(&self) -> Option<usize> {
        self.averages
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &avg)| match best {
                Some((_, b)) if b <= avg => best,
                _ => Some((i, avg)),
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rounds_to_two_decimals() {
        let sample = TimingSample::from_duration(Duration::from_millis(1234));
        assert_eq!(sample.seconds, 1.23);

        let sample = TimingSample::from_duration(Duration::from_millis(1236));
        assert_eq!(sample.seconds, 1.24);

        let sample = TimingSample::from_duration(Duration::from_micros(4_000));
        assert_eq!(sample.seconds, 0.0);
    }

    #[test]
    fn test_fastest_corpus() {
        let mut result = ComparisonResult::new("\"cat\"");
        assert_eq!(result.fastest(), None);

        result.push_average(0.52);
        result.push_average(0.13);
        result.push_average(0.13);
        assert_eq!(result.fastest(), Some(1));
    }
}
