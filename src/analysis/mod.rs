//! Style analysis: per-document extraction and cross-document merging.
//!
//! ```text
//! PageRuns[] ──► RunCollector ──┐
//!                               ├──► StyleProfileExtractor ──► StyleProfile
//! raw bytes  ──► ColorSampler ──┘                                   │
//!                                     StyleProfile[] ──► ProfileMerger ──► MergedStyleProfile
//! ```

mod batch;
mod collector;
mod color;
mod extractor;
mod merger;
mod options;

pub use batch::{analyze_batch, analyze_document, BatchReport, DocumentFailure, DocumentInput, DocumentSummary};
pub use collector::{FontClassifier, RunCollector, RunStatistics};
pub use color::ColorSampler;
pub use extractor::StyleProfileExtractor;
pub use merger::{merge_profiles, ProfileMerger};
pub use options::ExtractOptions;

use std::collections::HashMap;

/// Occurrence counter that remembers first-seen order.
///
/// Ranking is a stable descending sort, so ties keep the order in which
/// keys were first added.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, key: &str, amount: u64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries sorted by count, highest first.
    pub(crate) fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, 0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Keep at most `max` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_table_ties_keep_insertion_order() {
        let mut table = FrequencyTable::new();
        table.add("b", 1);
        table.add("a", 2);
        table.add("c", 1);
        table.add("b", 1);

        let ranked: Vec<String> = table.ranked().into_iter().map(|(k, _)| k).collect();
        assert_eq!(ranked, vec!["b", "a", "c"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(0.456, 2), 0.46);
        assert_eq!(round_to(31.5, 0), 32.0);
    }

    #[test]
    fn test_truncate_chars_is_char_based() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
