//! Threshold calibration
//!
//! A learned tree tends to be tight around the labeled examples. Relaxing
//! every threshold one step widens the rule so the next execution surfaces
//! pairs near the decision boundary: thresholds of positive atoms drop by
//! [`DELTA`], thresholds of atoms under a MINUS rise by it.
//!
//! Arithmetic runs on decimals so that `0.3 - 0.1` gives `0.2`, not
//! `0.19999999999999998`.

use linkspec_core::{Operator, RuleTree};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

/// Relaxation step
pub const DELTA: f64 = 0.1;

/// Smallest threshold a relaxed positive atom can reach
pub const MIN_THRESHOLD: f64 = 0.01;

/// Largest threshold a relaxed MINUS atom can reach
pub const MAX_THRESHOLD: f64 = 1.0;

/// Relax every threshold of `rule` and return the new tree.
///
/// The root is treated as being under a MINUS exactly when its own operator
/// is MINUS. The input tree is left untouched.
pub fn relax(rule: &RuleTree) -> RuleTree {
    relax_with(rule, rule.operator() == Some(Operator::Minus))
}

/// Relax `rule` given whether it sits under a MINUS node.
///
/// The flag is inherited by the children of every node and forced to `true`
/// below a MINUS node.
pub fn relax_with(rule: &RuleTree, under_minus: bool) -> RuleTree {
    match rule {
        RuleTree::Atomic {
            expression,
            threshold,
        } => {
            let relaxed = relax_threshold(*threshold, under_minus);
            trace!(expression = %expression, from = threshold, to = relaxed, under_minus, "Relaxed threshold");
            RuleTree::atomic(expression.clone(), relaxed)
        }
        RuleTree::Combinator { operator, children } => {
            let child_flag = under_minus || *operator == Operator::Minus;
            let children = children
                .iter()
                .map(|child| relax_with(child, child_flag))
                .collect();
            RuleTree::combinator(*operator, children)
        }
    }
}

/// Move a single threshold one step.
///
/// Under a MINUS the threshold rises to at most 1.0, except 0.0 which stays
/// put. Otherwise it drops to at least 0.01.
pub fn relax_threshold(threshold: f64, under_minus: bool) -> f64 {
    let Some(current) = to_decimal(threshold) else {
        return threshold;
    };
    let delta = Decimal::new(1, 1);

    let relaxed = if under_minus {
        if current.is_zero() {
            current
        } else {
            (current + delta).min(Decimal::ONE)
        }
    } else {
        (current - delta).max(Decimal::new(1, 2))
    };

    from_decimal(relaxed).unwrap_or(threshold)
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64_retain(value))
}

fn from_decimal(value: Decimal) -> Option<f64> {
    f64::from_str(&value.normalize().to_string())
        .ok()
        .or_else(|| value.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkspec_core::MetricExpression;

    fn atom(measure: &str, threshold: f64) -> RuleTree {
        RuleTree::atomic(MetricExpression::new(measure, "name", "label"), threshold)
    }

    #[test]
    fn test_positive_atoms_drop() {
        assert_eq!(relax(&atom("jaro", 0.5)).threshold(), Some(0.4));
        assert_eq!(relax(&atom("jaro", 0.3)).threshold(), Some(0.2));
        assert_eq!(relax(&atom("jaro", 1.0)).threshold(), Some(0.9));
    }

    #[test]
    fn test_floor() {
        assert_eq!(relax(&atom("jaro", 0.05)).threshold(), Some(0.01));
        assert_eq!(relax(&atom("jaro", 0.01)).threshold(), Some(0.01));
        assert_eq!(relax(&atom("jaro", 0.0)).threshold(), Some(0.01));
    }

    #[test]
    fn test_minus_atoms_rise() {
        let rule = RuleTree::minus(vec![atom("cosine", 0.5), atom("jaro", 0.95)]);
        let relaxed = relax(&rule);
        let thresholds: Vec<f64> = relaxed.atoms().into_iter().map(|(_, t)| t).collect();
        assert_eq!(thresholds, [0.6, 1.0]);
    }

    #[test]
    fn test_minus_zero_stays() {
        let rule = RuleTree::minus(vec![atom("cosine", 0.0), atom("jaro", 0.9)]);
        let relaxed = relax(&rule);
        let thresholds: Vec<f64> = relaxed.atoms().into_iter().map(|(_, t)| t).collect();
        assert_eq!(thresholds, [0.0, 1.0]);
    }

    #[test]
    fn test_flag_inherited_through_nested_nodes() {
        let rule = RuleTree::and(vec![
            atom("cosine", 0.7),
            RuleTree::minus(vec![
                atom("jaro", 0.8),
                RuleTree::or(vec![atom("trigrams", 0.6), atom("qgrams", 0.4)]),
            ]),
        ]);
        let relaxed = relax(&rule);
        let thresholds: Vec<f64> = relaxed.atoms().into_iter().map(|(_, t)| t).collect();
        assert_eq!(thresholds, [0.6, 0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_shape_preserved_and_input_untouched() {
        let rule = RuleTree::or(vec![atom("cosine", 0.7), atom("jaccard", 0.2)]);
        let before = rule.clone();
        let relaxed = relax(&rule);

        assert_eq!(rule, before);
        assert_eq!(relaxed.operator(), Some(Operator::Or));
        assert_eq!(relaxed.size(), rule.size());
        assert_eq!(relaxed.to_string(), "OR(cosine(x.name, y.label)|0.6, jaccard(x.name, y.label)|0.1)");
    }

    #[test]
    fn test_relax_threshold_direct() {
        assert_eq!(relax_threshold(0.15, false), 0.05);
        assert_eq!(relax_threshold(0.15, true), 0.25);
        assert!(relax_threshold(f64::NAN, false).is_nan());
    }
}
