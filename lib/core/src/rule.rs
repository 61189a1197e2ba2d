// Rule trees (link specifications): atomic measure/threshold leaves combined
// with boolean operators.
use crate::{Error, MetricExpression, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Pairs accepted by every child
    And,
    /// Pairs accepted by at least one child
    Or,
    /// Pairs accepted by exactly one child
    Xor,
    /// Pairs accepted by the first child and by none of the others
    Minus,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Minus => "MINUS",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            "XOR" => Ok(Operator::Xor),
            "MINUS" => Ok(Operator::Minus),
            other => Err(Error::UnknownOperator(other.to_string())),
        }
    }
}

/// A link specification.
///
/// Trees are values: transformations such as threshold calibration build a
/// new tree and leave the original untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleTree {
    Atomic {
        expression: MetricExpression,
        threshold: f64,
    },
    Combinator {
        operator: Operator,
        children: Vec<RuleTree>,
    },
}

impl RuleTree {
    #[inline]
    #[must_use]
    pub fn atomic(expression: MetricExpression, threshold: f64) -> Self {
        RuleTree::Atomic {
            expression,
            threshold,
        }
    }

    /// Parse the expression and build an atomic node
    pub fn parse_atomic(expression: &str, threshold: f64) -> Result<Self> {
        Ok(Self::atomic(MetricExpression::parse(expression)?, threshold))
    }

    #[inline]
    #[must_use]
    pub fn combinator(operator: Operator, children: Vec<RuleTree>) -> Self {
        RuleTree::Combinator { operator, children }
    }

    pub fn and(children: Vec<RuleTree>) -> Self {
        Self::combinator(Operator::And, children)
    }

    pub fn or(children: Vec<RuleTree>) -> Self {
        Self::combinator(Operator::Or, children)
    }

    pub fn xor(children: Vec<RuleTree>) -> Self {
        Self::combinator(Operator::Xor, children)
    }

    pub fn minus(children: Vec<RuleTree>) -> Self {
        Self::combinator(Operator::Minus, children)
    }

    #[inline]
    pub fn is_atomic(&self) -> bool {
        matches!(self, RuleTree::Atomic { .. })
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            RuleTree::Atomic { .. } => None,
            RuleTree::Combinator { operator, .. } => Some(*operator),
        }
    }

    pub fn threshold(&self) -> Option<f64> {
        match self {
            RuleTree::Atomic { threshold, .. } => Some(*threshold),
            RuleTree::Combinator { .. } => None,
        }
    }

    pub fn children(&self) -> &[RuleTree] {
        match self {
            RuleTree::Atomic { .. } => &[],
            RuleTree::Combinator { children, .. } => children,
        }
    }

    /// Atomic leaves in depth-first, left-to-right order
    pub fn atoms(&self) -> Vec<(&MetricExpression, f64)> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, atoms: &mut Vec<(&'a MetricExpression, f64)>) {
        match self {
            RuleTree::Atomic {
                expression,
                threshold,
            } => atoms.push((expression, *threshold)),
            RuleTree::Combinator { children, .. } => {
                for child in children {
                    child.collect_atoms(atoms);
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(RuleTree::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(RuleTree::depth).max().unwrap_or(0)
    }

    /// Reject combinators without children and thresholds outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        match self {
            RuleTree::Atomic {
                expression,
                threshold,
            } => {
                if !(0.0..=1.0).contains(threshold) {
                    return Err(Error::InvalidRule(format!(
                        "threshold {} of {} outside [0, 1]",
                        threshold, expression
                    )));
                }
                Ok(())
            }
            RuleTree::Combinator { operator, children } => {
                if children.is_empty() {
                    return Err(Error::InvalidRule(format!("{} without children", operator)));
                }
                children.iter().try_for_each(RuleTree::validate)
            }
        }
    }
}

/// One-line rendering, e.g. `AND(cosine(x.a, y.a)|0.5, jaro(x.b, y.b)|0.8)`
impl fmt::Display for RuleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTree::Atomic {
                expression,
                threshold,
            } => write!(f, "{}|{}", expression, threshold),
            RuleTree::Combinator { operator, children } => {
                write!(f, "{}(", operator)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(measure: &str, threshold: f64) -> RuleTree {
        RuleTree::atomic(MetricExpression::new(measure, "name", "name"), threshold)
    }

    #[test]
    fn test_display_one_line() {
        let rule = RuleTree::minus(vec![leaf("cosine", 0.5), leaf("jaro", 0.9)]);
        assert_eq!(
            rule.to_string(),
            "MINUS(cosine(x.name, y.name)|0.5, jaro(x.name, y.name)|0.9)"
        );
    }

    #[test]
    fn test_atoms_depth_first() {
        let rule = RuleTree::and(vec![
            RuleTree::or(vec![leaf("cosine", 0.5), leaf("jaccard", 0.3)]),
            leaf("jaro", 0.8),
        ]);
        let atoms = rule.atoms();
        let measures: Vec<&str> = atoms.iter().map(|(e, _)| e.measure.as_str()).collect();
        assert_eq!(measures, ["cosine", "jaccard", "jaro"]);
        assert_eq!(rule.size(), 5);
        assert_eq!(rule.depth(), 3);
    }

    #[test]
    fn test_validate() {
        assert!(leaf("cosine", 0.4).validate().is_ok());
        assert!(leaf("cosine", 1.4).validate().is_err());
        assert!(RuleTree::and(vec![]).validate().is_err());
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("minus".parse::<Operator>().unwrap(), Operator::Minus);
        assert!("NAND".parse::<Operator>().is_err());
    }

    #[test]
    fn test_serde_tagged() {
        let rule = RuleTree::or(vec![leaf("trigrams", 0.7)]);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "combinator",
                "operator": "OR",
                "children": [
                    {"type": "atomic", "expression": "trigrams(x.name, y.name)", "threshold": 0.7}
                ]
            })
        );
        let back: RuleTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}
