//! Batch error tally
//!
//! Per-entity failures never abort processing; they are counted here by
//! (stage, cause) and reported at the end of a batch run. The tally is an
//! explicit value threaded through the pipeline, not ambient global state,
//! and merges by value so batch runs can fan out per document.

use std::collections::BTreeMap;
use std::fmt;

/// Append-only failure counter keyed by `stage: cause`
#[derive(Debug, Clone, Default)]
pub struct ErrorTally {
    counts: BTreeMap<String, u64>,
}

impl ErrorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure of `cause` at `stage`
    pub fn record(&mut self, stage: &str, cause: impl fmt::Display) {
        let key = format!("{}: {}", stage, cause);
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: ErrorTally) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of recorded failures
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate (cause, count) in deterministic (sorted) order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut tally = ErrorTally::new();
        assert!(tally.is_empty());

        tally.record("spline:evaluator", "knot count mismatch");
        tally.record("spline:evaluator", "knot count mismatch");
        tally.record("explode", "unknown block REF1");

        assert_eq!(tally.total(), 3);
        let entries: Vec<_> = tally.iter().collect();
        assert_eq!(entries[0], ("explode: unknown block REF1", 1));
        assert_eq!(entries[1], ("spline:evaluator: knot count mismatch", 2));
    }

    #[test]
    fn test_merge_sums_per_cause() {
        let mut a = ErrorTally::new();
        a.record("draw", "bad arc");

        let mut b = ErrorTally::new();
        b.record("draw", "bad arc");
        b.record("bbox", "no points");

        a.merge(b);
        assert_eq!(a.total(), 3);
        let entries: Vec<_> = a.iter().collect();
        assert_eq!(entries[0], ("bbox: no points", 1));
        assert_eq!(entries[1], ("draw: bad arc", 2));
    }
}
