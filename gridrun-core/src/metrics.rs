//! Metric extraction from captured job output.
//!
//! Training jobs report progress as free text. This module defines the
//! `MetricExtractor` trait for scraping a single numeric metric out of
//! that text, plus the built-in accuracy extractor used by the sweep.

use regex::Regex;

/// Trait for extracting one numeric metric from captured job output.
///
/// Implementations must be pure: same text in, same value out, no side
/// effects. A missing metric is a valid outcome, not an error, and maps
/// to the extractor's default value.
pub trait MetricExtractor: Send + Sync {
    /// Extract the metric from the full captured text.
    fn extract(&self, text: &str) -> f64;
}

/// Extracts the final reported accuracy percentage.
///
/// Matches lines like `Accuracy: 9876/10000 (98.76%)` and returns the
/// percentage of the last match; later matches reflect later, more
/// converged epochs. Returns 0.0 when no line matches.
pub struct AccuracyExtractor {
    pattern: Regex,
}

impl AccuracyExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"Accuracy:\s*\d+/\d+\s*\(([\d.]+)%\)").unwrap(),
        }
    }
}

impl Default for AccuracyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricExtractor for AccuracyExtractor {
    fn extract(&self, text: &str) -> f64 {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps[1].parse::<f64>().ok())
            .last()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_match() {
        let extractor = AccuracyExtractor::new();
        assert_eq!(extractor.extract("Accuracy: 9876/10000 (98.76%)"), 98.76);
    }

    #[test]
    fn test_extract_takes_last_match() {
        let extractor = AccuracyExtractor::new();
        let text = "Epoch 1\nAccuracy: 9000/10000 (90.00%)\nEpoch 2\nAccuracy: 9512/10000 (95.12%)\n";
        assert_eq!(extractor.extract(text), 95.12);
    }

    #[test]
    fn test_extract_no_match_defaults_to_zero() {
        let extractor = AccuracyExtractor::new();
        assert_eq!(extractor.extract("no metric present"), 0.0);
        assert_eq!(extractor.extract(""), 0.0);
    }

    #[test]
    fn test_extract_embedded_in_noise() {
        let extractor = AccuracyExtractor::new();
        let text = "step 4400 loss=0.031\nTest set: Average loss: 0.0301, Accuracy: 9907/10000 (99.07%)\ndone";
        assert_eq!(extractor.extract(text), 99.07);
    }

    #[test]
    fn test_extract_flexible_whitespace() {
        let extractor = AccuracyExtractor::new();
        assert_eq!(extractor.extract("Accuracy:9907/10000(99.07%)"), 99.07);
        assert_eq!(extractor.extract("Accuracy:  42/100   (42.0%)"), 42.0);
    }

    #[test]
    fn test_extract_skips_unparseable_group() {
        let extractor = AccuracyExtractor::new();
        // "1.2.3" matches the character class but is not a float; the
        // earlier parseable match must win.
        let text = "Accuracy: 9000/10000 (90.00%)\nAccuracy: 1/2 (1.2.3%)";
        assert_eq!(extractor.extract(text), 90.0);
    }

    #[test]
    fn test_extract_is_pure() {
        let extractor = AccuracyExtractor::new();
        let text = "Accuracy: 9876/10000 (98.76%)";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
