//! Feature materialization of labeled pairs

use crate::error::{LearnError, LearnResult};
use crate::schema::{ClassLabel, FeatureSchema};
use linkspec_core::{Mapping, RecordCache};
use linkspec_similarity::SimilarityEngine;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Threshold passed to the similarity engine while computing features.
/// Low enough that no real score is cut off.
pub const PROBE_THRESHOLD: f64 = 0.01;

/// One labeled pair with its feature vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance {
    pub source: String,
    pub target: String,
    /// Reference value from the labeled mapping
    pub value: f64,
    /// One entry per schema feature, in schema order
    pub features: Vec<f64>,
    pub label: ClassLabel,
}

/// Labeled instances ready for the classifier
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSet {
    pub schema: FeatureSchema,
    pub instances: Vec<Instance>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.instances
            .iter()
            .filter(|i| i.label == ClassLabel::Positive)
            .count()
    }

    pub fn negatives(&self) -> usize {
        self.len() - self.positives()
    }

    /// Both classes present. A tree learned from a single class says nothing.
    pub fn is_diverse(&self) -> bool {
        self.positives() > 0 && self.negatives() > 0
    }

    /// Feature vector of the instance at `index`, class value appended last
    pub fn row(&self, index: usize) -> Option<Vec<String>> {
        self.instances.get(index).map(|instance| {
            instance
                .features
                .iter()
                .map(f64::to_string)
                .chain(std::iter::once(instance.label.to_string()))
                .collect()
        })
    }
}

/// Compute the feature vector of every labeled pair.
///
/// Instances keep the mapping's order. A pair whose source or target record
/// is missing from the caches is kept; the similarity engine decides what a
/// missing record scores.
pub fn materialize(
    schema: &FeatureSchema,
    labeled: &Mapping,
    source: &RecordCache,
    target: &RecordCache,
    similarity: &dyn SimilarityEngine,
) -> LearnResult<TrainingSet> {
    if labeled.is_empty() {
        return Err(LearnError::EmptyBatch);
    }

    let expressions: Vec<_> = schema.features().iter().map(|f| f.expression()).collect();

    let instances: Vec<Instance> = labeled
        .links()
        .par_iter()
        .map(|link| {
            let s = source.get(&link.source);
            let t = target.get(&link.target);
            if s.is_none() || t.is_none() {
                warn!(
                    source = %link.source,
                    target = %link.target,
                    source_missing = s.is_none(),
                    target_missing = t.is_none(),
                    "Labeled pair references a record missing from the cache"
                );
            }

            let features = expressions
                .iter()
                .map(|expr| similarity.similarity(s, t, expr, PROBE_THRESHOLD))
                .collect();

            Instance {
                source: link.source.clone(),
                target: link.target.clone(),
                value: link.value,
                features,
                label: ClassLabel::from_reference_value(link.value),
            }
        })
        .collect();

    let set = TrainingSet {
        schema: schema.clone(),
        instances,
    };
    debug!(
        instances = set.len(),
        features = schema.len(),
        positives = set.positives(),
        "Materialized training set"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertyMapping;
    use linkspec_core::{MetricExpression, Record};
    use linkspec_similarity::BuiltinSimilarity;
    use std::sync::{Arc, Mutex};

    fn caches() -> (RecordCache, RecordCache) {
        let source = RecordCache::from_records(vec![
            Record::new("s1").with_property("name", "Leipzig"),
            Record::new("s2").with_property("name", "Dresden"),
        ]);
        let target = RecordCache::from_records(vec![
            Record::new("t1").with_property("label", "Leipzig"),
            Record::new("t2").with_property("label", "Berlin"),
        ]);
        (source, target)
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::build(&PropertyMapping::new().with_string("name", "label")).unwrap()
    }

    #[test]
    fn test_materialize_order_and_labels() {
        let (source, target) = caches();
        let mut labeled = Mapping::new();
        labeled.add("s1", "t1", 1.0);
        labeled.add("s2", "t2", 0.0);
        labeled.add("s1", "t2", 0.5);

        let set = materialize(&schema(), &labeled, &source, &target, &BuiltinSimilarity).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.instances[0].source, "s1");
        assert_eq!(set.instances[0].label, ClassLabel::Positive);
        assert_eq!(set.instances[1].label, ClassLabel::Negative);
        assert_eq!(set.instances[2].label, ClassLabel::Negative);
        assert!(set.is_diverse());

        // identical names score 1.0 on every string measure
        assert!(set.instances[0].features.iter().all(|v| (*v - 1.0).abs() < 1e-9));
        assert_eq!(set.instances[0].features.len(), 5);
    }

    #[test]
    fn test_materialize_empty_batch() {
        let (source, target) = caches();
        let result = materialize(&schema(), &Mapping::new(), &source, &target, &BuiltinSimilarity);
        assert!(matches!(result, Err(LearnError::EmptyBatch)));
    }

    #[test]
    fn test_missing_record_kept() {
        let (source, target) = caches();
        let mut labeled = Mapping::new();
        labeled.add("s9", "t1", 1.0);

        let set = materialize(&schema(), &labeled, &source, &target, &BuiltinSimilarity).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.instances[0].features.iter().all(|v| *v == 0.0));
        assert!(!set.is_diverse());
    }

    #[test]
    fn test_feature_threshold_passed() {
        struct ThresholdEcho;
        impl SimilarityEngine for ThresholdEcho {
            fn similarity(
                &self,
                _source: Option<&Record>,
                _target: Option<&Record>,
                _expression: &MetricExpression,
                threshold: f64,
            ) -> f64 {
                threshold
            }
        }

        let (source, target) = caches();
        let mut labeled = Mapping::new();
        labeled.add("s1", "t1", 1.0);
        let set = materialize(&schema(), &labeled, &source, &target, &ThresholdEcho).unwrap();
        assert!(set.instances[0].features.iter().all(|v| *v == PROBE_THRESHOLD));
    }

    #[derive(Clone)]
    struct SharedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_record_warning_names_side() {
        // materialize runs on rayon workers, so the subscriber has to be global
        let log = SharedLog(Arc::new(Mutex::new(Vec::new())));
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();

        let (source, target) = caches();
        let mut labeled = Mapping::new();
        labeled.add("s1", "t404", 1.0);
        labeled.add("s404", "t1", 0.0);
        materialize(&schema(), &labeled, &source, &target, &BuiltinSimilarity).unwrap();

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        let line_for = |id: &str| {
            output
                .lines()
                .find(|l| l.contains(id))
                .unwrap_or_else(|| panic!("no warning for {id} in {output}"))
                .to_string()
        };
        let missing_target = line_for("t404");
        assert!(missing_target.contains("source_missing=false"));
        assert!(missing_target.contains("target_missing=true"));
        let missing_source = line_for("s404");
        assert!(missing_source.contains("source_missing=true"));
        assert!(missing_source.contains("target_missing=false"));
    }

    #[test]
    fn test_row_appends_class() {
        let (source, target) = caches();
        let mut labeled = Mapping::new();
        labeled.add("s2", "t2", 0.0);
        let set = materialize(&schema(), &labeled, &source, &target, &BuiltinSimilarity).unwrap();
        let row = set.row(0).unwrap();
        assert_eq!(row.len(), 6);
        assert_eq!(row.last().unwrap(), "negative");
        assert!(set.row(1).is_none());
    }
}
