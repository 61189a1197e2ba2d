//! Candidate ranking
//!
//! Orders the pairs accepted by the relaxed rule by how close they sit to
//! the learned decision boundary and keeps the closest ones the oracle has
//! not judged yet.

use ahash::AHashSet;
use linkspec_core::{Link, Mapping, MetricExpression, Record, RecordCache, RuleTree};
use linkspec_similarity::SimilarityEngine;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Measures the learned tree splits on, each with the threshold at which it splits
pub type MeasuresUsed = BTreeMap<MetricExpression, f64>;

/// Collect the atoms of a rule as measures-used. A measure appearing twice
/// keeps the threshold of its last occurrence.
pub fn measures_from_rule(rule: &RuleTree) -> MeasuresUsed {
    rule.atoms()
        .into_iter()
        .map(|(expression, threshold)| (expression.clone(), threshold))
        .collect()
}

/// A pair considered for presentation to the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub source: String,
    pub target: String,
    /// Value the rule execution reported for the pair
    pub value: f64,
    pub compound_distance: f64,
}

impl Candidate {
    /// Unscored candidate, distance at the maximum
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
            compound_distance: f64::MAX,
        }
    }

    #[must_use]
    pub fn with_distance(mut self, compound_distance: f64) -> Self {
        self.compound_distance = compound_distance;
        self
    }
}

/// (source, target, value) triples already shown to the oracle.
///
/// Only grows. The value is part of the key: a pair resurfacing with a
/// different value counts as new.
#[derive(Debug, Clone, Default)]
pub struct PreviouslyPresented {
    triples: AHashSet<(String, String, OrderedFloat<f64>)>,
}

impl PreviouslyPresented {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn insert(&mut self, source: &str, target: &str, value: f64) -> bool {
        self.triples
            .insert((source.to_string(), target.to_string(), OrderedFloat(value)))
    }

    /// Union with every link of the mapping
    pub fn extend_from(&mut self, mapping: &Mapping) {
        for link in mapping {
            self.insert(&link.source, &link.target, link.value);
        }
    }

    pub fn contains(&self, source: &str, target: &str, value: f64) -> bool {
        // tuple keys cannot be borrowed as (&str, &str, _), so build one
        self.triples
            .contains(&(source.to_string(), target.to_string(), OrderedFloat(value)))
    }

    pub fn contains_candidate(&self, candidate: &Candidate) -> bool {
        self.contains(&candidate.source, &candidate.target, candidate.value)
    }

    /// Triples as a mapping, sorted for stable output
    pub fn to_mapping(&self) -> Mapping {
        let mut triples: Vec<_> = self.triples.iter().collect();
        triples.sort();
        triples
            .into_iter()
            .map(|(s, t, v)| Link::new(s.as_str(), t.as_str(), v.into_inner()))
            .collect()
    }
}

impl From<&Mapping> for PreviouslyPresented {
    fn from(mapping: &Mapping) -> Self {
        let mut presented = Self::new();
        presented.extend_from(mapping);
        presented
    }
}

/// Sum of squared gaps between each measure's score and its boundary threshold
pub fn compound_distance(
    similarity: &dyn SimilarityEngine,
    source: Option<&Record>,
    target: Option<&Record>,
    measures_used: &MeasuresUsed,
) -> f64 {
    measures_used
        .iter()
        .map(|(expression, threshold)| {
            let gap = similarity.similarity(source, target, expression, *threshold) - threshold;
            gap * gap
        })
        .sum()
}

/// Score every pair of a candidate mapping. Output keeps the mapping's order.
pub fn score_candidates(
    mapping: &Mapping,
    source: &RecordCache,
    target: &RecordCache,
    measures_used: &MeasuresUsed,
    similarity: &dyn SimilarityEngine,
) -> Vec<Candidate> {
    mapping
        .links()
        .par_iter()
        .map(|link| {
            let distance = compound_distance(
                similarity,
                source.get(&link.source),
                target.get(&link.target),
                measures_used,
            );
            Candidate::new(link.source.as_str(), link.target.as_str(), link.value)
                .with_distance(distance)
        })
        .collect()
}

/// Drop presented candidates, sort the rest by ascending distance and keep
/// at most `batch_size`. Ties keep their input order.
pub fn rank_candidates(
    candidates: Vec<Candidate>,
    presented: &PreviouslyPresented,
    batch_size: usize,
) -> Vec<Candidate> {
    let total = candidates.len();
    let mut fresh: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| !presented.contains_candidate(c))
        .collect();

    fresh.sort_by(|a, b| a.compound_distance.total_cmp(&b.compound_distance));
    fresh.truncate(batch_size);

    debug!(
        candidates = total,
        selected = fresh.len(),
        batch_size,
        "Ranked candidates"
    );
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkspec_similarity::BuiltinSimilarity;

    fn candidate(id: &str, distance: f64) -> Candidate {
        Candidate::new(id, id, 0.5).with_distance(distance)
    }

    fn ids(batch: &[Candidate]) -> Vec<&str> {
        batch.iter().map(|c| c.source.as_str()).collect()
    }

    #[test]
    fn test_stable_ranking() {
        let candidates = vec![
            candidate("A", 0.4),
            candidate("B", 0.1),
            candidate("C", 0.1),
            candidate("D", 0.9),
        ];
        let batch = rank_candidates(candidates, &PreviouslyPresented::new(), 3);
        assert_eq!(ids(&batch), ["B", "C", "A"]);
    }

    #[test]
    fn test_batch_larger_than_candidates() {
        let candidates = vec![candidate("A", 0.4), candidate("B", 0.1)];
        let batch = rank_candidates(candidates, &PreviouslyPresented::new(), 10);
        assert_eq!(ids(&batch), ["B", "A"]);
        assert!(rank_candidates(vec![candidate("A", 0.0)], &PreviouslyPresented::new(), 0).is_empty());
    }

    #[test]
    fn test_presented_triples_filtered() {
        let mut presented = PreviouslyPresented::new();
        presented.insert("B", "B", 0.5);
        presented.insert("C", "C", 1.0);

        let candidates = vec![candidate("A", 0.4), candidate("B", 0.1), candidate("C", 0.1)];
        let batch = rank_candidates(candidates, &presented, 3);
        // C was presented with another value and stays eligible
        assert_eq!(ids(&batch), ["C", "A"]);
    }

    #[test]
    fn test_presented_set_monotonic() {
        let mut oracle = Mapping::new();
        oracle.add("s1", "t1", 1.0);
        oracle.add("s2", "t2", 0.0);

        let mut presented = PreviouslyPresented::from(&oracle);
        assert_eq!(presented.len(), 2);
        presented.extend_from(&oracle);
        assert_eq!(presented.len(), 2);
        assert!(presented.contains("s2", "t2", 0.0));

        let mapping = presented.to_mapping();
        assert_eq!(mapping.links()[0].source, "s1");
    }

    #[test]
    fn test_compound_distance_and_scoring() {
        let source = RecordCache::from_records(vec![Record::new("s1").with_property("name", "abc")]);
        let target = RecordCache::from_records(vec![
            Record::new("t1").with_property("name", "abc"),
            Record::new("t2").with_property("name", "xyz"),
        ]);
        let mut measures = MeasuresUsed::new();
        measures.insert(MetricExpression::new("exactmatch", "name", "name"), 0.5);

        let mut mapping = Mapping::new();
        mapping.add("s1", "t1", 1.0);
        mapping.add("s1", "t2", 0.0);
        mapping.add("s9", "t1", 0.3);

        let scored = score_candidates(
            &mapping,
            &source,
            &target,
            &measures,
            &BuiltinSimilarity,
        );
        assert_eq!(scored.len(), 3);
        assert!((scored[0].compound_distance - 0.25).abs() < 1e-12);
        assert!((scored[1].compound_distance - 0.25).abs() < 1e-12);
        assert_eq!(scored[2].source, "s9");
        assert_eq!(scored[2].value, 0.3);
    }

    #[test]
    fn test_measures_from_rule() {
        let rule = RuleTree::and(vec![
            RuleTree::atomic(MetricExpression::new("jaro", "a", "b"), 0.8),
            RuleTree::atomic(MetricExpression::new("cosine", "a", "b"), 0.4),
        ]);
        let measures = measures_from_rule(&rule);
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[&MetricExpression::new("cosine", "a", "b")], 0.4);
    }

    #[test]
    fn test_unscored_candidate_is_maximal() {
        assert_eq!(Candidate::new("s", "t", 1.0).compound_distance, f64::MAX);
    }
}
