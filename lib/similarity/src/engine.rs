//! The similarity engine seam and its built-in implementation

use crate::distance::string_similarity;
use crate::measure::{Measure, MeasureKind};
use crate::pointset::{parse_point, point_set_similarity, GeoPoint};
use crate::temporal::date_similarity;
use linkspec_core::{MetricExpression, Record};
use std::sync::Arc;
use tracing::warn;

/// Score returned when the source or the target record is missing
pub const MISSING_RECORD_SIMILARITY: f64 = 0.0;

/// Computes the similarity of a record pair under a metric expression.
///
/// Implementations must be deterministic and must not panic on missing
/// records or properties; they return a low sentinel score instead.
pub trait SimilarityEngine: Send + Sync {
    /// Similarity in [0, 1]. `threshold` is a hint below which the exact
    /// score is not needed; implementations may return any value under it.
    fn similarity(
        &self,
        source: Option<&Record>,
        target: Option<&Record>,
        expression: &MetricExpression,
        threshold: f64,
    ) -> f64;
}

impl<T: SimilarityEngine + ?Sized> SimilarityEngine for &T {
    fn similarity(
        &self,
        source: Option<&Record>,
        target: Option<&Record>,
        expression: &MetricExpression,
        threshold: f64,
    ) -> f64 {
        (**self).similarity(source, target, expression, threshold)
    }
}

impl<T: SimilarityEngine + ?Sized> SimilarityEngine for Arc<T> {
    fn similarity(
        &self,
        source: Option<&Record>,
        target: Option<&Record>,
        expression: &MetricExpression,
        threshold: f64,
    ) -> f64 {
        (**self).similarity(source, target, expression, threshold)
    }
}

impl<T: SimilarityEngine + ?Sized> SimilarityEngine for Box<T> {
    fn similarity(
        &self,
        source: Option<&Record>,
        target: Option<&Record>,
        expression: &MetricExpression,
        threshold: f64,
    ) -> f64 {
        (**self).similarity(source, target, expression, threshold)
    }
}

/// Built-in engine backed by the measures in [`Measure`].
///
/// String and date measures take the best score over all value pairs of the
/// two properties. Point-set measures compare all values as one set. Unknown
/// measures score 0.0. Always returns the exact score, ignoring `threshold`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSimilarity;

impl BuiltinSimilarity {
    pub fn new() -> Self {
        Self
    }

    /// Compare the values of two properties with a known measure
    pub fn compare_values(&self, measure: Measure, source: &[String], target: &[String]) -> f64 {
        if source.is_empty() || target.is_empty() {
            return 0.0;
        }
        match measure.kind() {
            MeasureKind::PointSet => {
                let points = |values: &[String]| -> Vec<GeoPoint> {
                    values.iter().filter_map(|v| parse_point(v)).collect()
                };
                point_set_similarity(&points(source), &points(target), measure).unwrap_or(0.0)
            }
            MeasureKind::String | MeasureKind::Date => source
                .iter()
                .flat_map(|a| target.iter().map(move |b| (a, b)))
                .filter_map(|(a, b)| {
                    string_similarity(a, b, measure).or_else(|| date_similarity(a, b, measure))
                })
                .fold(0.0, f64::max),
        }
    }
}

impl SimilarityEngine for BuiltinSimilarity {
    fn similarity(
        &self,
        source: Option<&Record>,
        target: Option<&Record>,
        expression: &MetricExpression,
        _threshold: f64,
    ) -> f64 {
        let (Some(source), Some(target)) = (source, target) else {
            return MISSING_RECORD_SIMILARITY;
        };
        let Some(measure) = Measure::from_name(&expression.measure) else {
            warn!(measure = %expression.measure, "Unknown similarity measure, scoring 0");
            return 0.0;
        };

        self.compare_values(
            measure,
            source.values(&expression.source_property),
            target.values(&expression.target_property),
        )
    }
}
