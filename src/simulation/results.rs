// src/simulation/results.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Measurement counts of a circuit execution: bit-string → number of shots.
///
/// Bit-strings list classical bits from the highest index down, so classical
/// bit 0 is the rightmost character. Keys are kept sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, usize>,
}

impl Counts {
    /// Creates an empty counts mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` shots to `bits`.
    pub fn record(&mut self, bits: impl Into<String>, count: usize) {
        *self.counts.entry(bits.into()).or_insert(0) += count;
    }

    /// Shots that produced `bits`, zero if never observed.
    pub fn get(&self, bits: &str) -> usize {
        self.counts.get(bits).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Fraction of shots that produced `bits`. Zero when there are no shots.
    pub fn ratio(&self, bits: &str) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(bits) as f64 / total as f64,
        }
    }

    /// Most frequent outcome. Ties go to the lexicographically smallest bit-string.
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        // BTreeMap iterates in ascending key order; keep the first maximum.
        self.counts
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (bits, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((bits.as_str(), count)),
            })
    }

    /// Ratio of every observed outcome.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total() as f64;
        self.counts.iter().map(|(bits, &count)| (bits.clone(), count as f64 / total)).collect()
    }

    /// Outcomes sorted by descending count, ties by bit-string.
    pub fn sorted_by_frequency(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.counts.iter().map(|(b, &c)| (b.as_str(), c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Iterates over `(bit-string, count)` in ascending bit-string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(b, &c)| (b.as_str(), c))
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bits, count) in iter {
            counts.record(bits, count);
        }
        counts
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counts ({} shots):", self.total())?;
        if self.counts.is_empty() {
            writeln!(f, "  No outcomes recorded.")?;
        }
        for (bits, count) in self.sorted_by_frequency() {
            writeln!(f, "  {}: {}", bits, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn record_accumulates() {
        let mut counts = Counts::new();
        counts.record("01", 3);
        counts.record("01", 2);
        counts.record("11", 5);
        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("00"), 0);
        assert_eq!(counts.total(), 10);
        assert_abs_diff_eq!(counts.ratio("11"), 0.5);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn ratio_of_empty_counts_is_zero() {
        assert_eq!(Counts::new().ratio("0"), 0.0);
        assert!(Counts::new().most_frequent().is_none());
    }

    #[test]
    fn most_frequent_breaks_ties_by_smallest_key() {
        let counts: Counts = [("10", 4), ("01", 4), ("00", 1)].into_iter().collect();
        assert_eq!(counts.most_frequent(), Some(("01", 4)));
        let counts: Counts = [("10", 5), ("01", 4)].into_iter().collect();
        assert_eq!(counts.most_frequent(), Some(("10", 5)));
    }

    #[test]
    fn sorted_by_frequency_orders_descending() {
        let counts: Counts = [("00", 1), ("11", 7), ("01", 7)].into_iter().collect();
        assert_eq!(counts.sorted_by_frequency(), vec![("01", 7), ("11", 7), ("00", 1)]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let counts: Counts = [("00", 2), ("11", 1)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"00":2,"11":1}"#);
        let back: Counts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }
}
