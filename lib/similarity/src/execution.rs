//! Rule execution: which (source, target) pairs does a rule tree accept?

use crate::engine::SimilarityEngine;
use linkspec_core::{Mapping, Operator, Record, RecordCache, RuleTree};
use tracing::debug;

/// Runs a rule tree against two record caches
pub trait ExecutionEngine: Send + Sync {
    fn execute(&self, rule: &RuleTree, source: &RecordCache, target: &RecordCache) -> Mapping;
}

impl<T: ExecutionEngine + ?Sized> ExecutionEngine for Box<T> {
    fn execute(&self, rule: &RuleTree, source: &RecordCache, target: &RecordCache) -> Mapping {
        (**self).execute(rule, source, target)
    }
}

/// Evaluates the rule on every pair of the cross product.
///
/// An atomic node accepts a pair when its similarity reaches the threshold
/// and reports that similarity. AND reports the minimum of its children, OR
/// and XOR the maximum of the accepting children, MINUS the value of its
/// first child. Output follows source order, then target order.
#[derive(Debug, Clone, Default)]
pub struct NestedLoopEngine<S> {
    similarity: S,
}

impl<S: SimilarityEngine> NestedLoopEngine<S> {
    pub fn new(similarity: S) -> Self {
        Self { similarity }
    }

    pub fn similarity(&self) -> &S {
        &self.similarity
    }

    /// Value the rule assigns to the pair, `None` when the pair is rejected
    pub fn evaluate(&self, rule: &RuleTree, source: &Record, target: &Record) -> Option<f64> {
        match rule {
            RuleTree::Atomic {
                expression,
                threshold,
            } => {
                let score = self
                    .similarity
                    .similarity(Some(source), Some(target), expression, *threshold);
                (score >= *threshold).then_some(score)
            }
            RuleTree::Combinator { operator, children } => {
                let (first, rest) = children.split_first()?;
                match operator {
                    Operator::And => children.iter().try_fold(f64::INFINITY, |acc, child| {
                        self.evaluate(child, source, target).map(|v| acc.min(v))
                    }),
                    Operator::Or => children
                        .iter()
                        .filter_map(|child| self.evaluate(child, source, target))
                        .reduce(f64::max),
                    Operator::Xor => {
                        let accepted: Vec<f64> = children
                            .iter()
                            .filter_map(|child| self.evaluate(child, source, target))
                            .collect();
                        match accepted.as_slice() {
                            [value] => Some(*value),
                            _ => None,
                        }
                    }
                    Operator::Minus => {
                        let value = self.evaluate(first, source, target)?;
                        rest.iter()
                            .all(|child| self.evaluate(child, source, target).is_none())
                            .then_some(value)
                    }
                }
            }
        }
    }
}

impl<S: SimilarityEngine> ExecutionEngine for NestedLoopEngine<S> {
    fn execute(&self, rule: &RuleTree, source: &RecordCache, target: &RecordCache) -> Mapping {
        let mut mapping = Mapping::new();
        for s in source {
            for t in target {
                if let Some(value) = self.evaluate(rule, s, t) {
                    mapping.add(s.id.as_str(), t.id.as_str(), value);
                }
            }
        }
        debug!(rule = %rule, links = mapping.len(), "Executed rule");
        mapping
    }
}
