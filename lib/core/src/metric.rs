//! Metric expressions of the form `measure(x.sourceProperty, y.targetProperty)`
//! and the feature names derived from them.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separates the measure from the property pair in a feature name
pub const FEATURE_DELIMITER: char = '§';

/// Separates source and target property in a feature name
pub const PROPERTY_SEPARATOR: char = '|';

pub const SOURCE_VAR: &str = "x";
pub const TARGET_VAR: &str = "y";

/// A similarity measure applied to one source property and one target property
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetricExpression {
    pub measure: String,
    pub source_property: String,
    pub target_property: String,
}

impl MetricExpression {
    pub fn new(
        measure: impl Into<String>,
        source_property: impl Into<String>,
        target_property: impl Into<String>,
    ) -> Self {
        Self {
            measure: measure.into().to_lowercase(),
            source_property: source_property.into(),
            target_property: target_property.into(),
        }
    }

    /// Parse `measure(x.a, y.b)`. Variable prefixes are optional.
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = || Error::InvalidExpression(expression.to_string());
        let trimmed = expression.trim();

        let open = trimmed.find('(').ok_or_else(invalid)?;
        if !trimmed.ends_with(')') {
            return Err(invalid());
        }
        let measure = trimmed[..open].trim();
        if measure.is_empty() {
            return Err(invalid());
        }

        let arguments: Vec<&str> = trimmed[open + 1..trimmed.len() - 1]
            .split(',')
            .map(str::trim)
            .collect();
        let [source, target] = arguments.as_slice() else {
            return Err(invalid());
        };

        let source = strip_variable(source);
        let target = strip_variable(target);
        if source.is_empty() || target.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(measure, source, target))
    }

    /// Name of the classifier feature computed by this expression
    pub fn feature_name(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.measure, FEATURE_DELIMITER, self.source_property, PROPERTY_SEPARATOR, self.target_property
        )
    }

    /// Inverse of [`MetricExpression::feature_name`]
    pub fn from_feature_name(name: &str) -> Result<Self> {
        let invalid = || Error::InvalidFeatureName(name.to_string());
        let (measure, properties) = name.split_once(FEATURE_DELIMITER).ok_or_else(invalid)?;
        let (source, target) = properties.split_once(PROPERTY_SEPARATOR).ok_or_else(invalid)?;
        if measure.is_empty() || source.is_empty() || target.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(measure, source, target))
    }
}

fn strip_variable(argument: &str) -> &str {
    match argument.split_once('.') {
        Some((_, property)) => property.trim(),
        None => argument,
    }
}

impl fmt::Display for MetricExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}.{}, {}.{})",
            self.measure, SOURCE_VAR, self.source_property, TARGET_VAR, self.target_property
        )
    }
}

impl FromStr for MetricExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MetricExpression {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MetricExpression> for String {
    fn from(expression: MetricExpression) -> Self {
        expression.to_string()
    }
}
