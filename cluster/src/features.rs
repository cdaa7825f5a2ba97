//! Feature-importance reduction.
//!
//! Each accepted `feature:prob:coverage` entry is ranked by
//! `score = prob * coverage`. Only the best [`DEFAULT_MAX_FEATURES`] survive,
//! and the value kept for each is its `prob`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Number of features kept per cluster unless configured otherwise.
pub const DEFAULT_MAX_FEATURES: usize = 600;

/// One accepted feature entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEntry<N> {
    pub feature: N,
    pub prob: f32,
    pub coverage: f32,
}

impl<N> FeatureEntry<N> {
    /// Ranking value, `prob * coverage`.
    pub fn score(&self) -> f32 {
        self.prob * self.coverage
    }
}

/// Accumulates feature entries in first-encounter order.
///
/// A repeated feature keeps its original position and takes the latest values.
#[derive(Debug, Clone)]
pub struct FeatureTable<N> {
    entries: Vec<FeatureEntry<N>>,
    positions: HashMap<N, usize>,
}

impl<N> Default for FeatureTable<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<N: Clone + Eq + Hash> FeatureTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: N, prob: f32, coverage: f32) {
        if let Some(&pos) = self.positions.get(&feature) {
            let entry = &mut self.entries[pos];
            entry.prob = prob;
            entry.coverage = coverage;
            return;
        }
        self.positions.insert(feature.clone(), self.entries.len());
        self.entries.push(FeatureEntry {
            feature,
            prob,
            coverage,
        });
    }

    /// Returns the number of distinct features.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all entries sorted by score, best first.
    ///
    /// Equal scores keep encounter order. NaN scores rank last.
    pub fn ranked(&self) -> Vec<&FeatureEntry<N>> {
        let mut ranked: Vec<&FeatureEntry<N>> = self.entries.iter().collect();
        ranked.sort_by(|a, b| by_score_desc(a.score(), b.score()));
        ranked
    }

    /// Returns `feature -> prob` for the `k` best-scoring features.
    pub fn top_k(&self, k: usize) -> HashMap<N, f32> {
        self.ranked()
            .into_iter()
            .take(k)
            .map(|e| (e.feature.clone(), e.prob))
            .collect()
    }
}

impl<N: Clone + Eq + Hash> FromIterator<(N, f32, f32)> for FeatureTable<N> {
    fn from_iter<T: IntoIterator<Item = (N, f32, f32)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (feature, prob, coverage) in iter {
            table.insert(feature, prob, coverage);
        }
        table
    }
}

fn by_score_desc(a: f32, b: f32) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    key(b).total_cmp(&key(a))
}
