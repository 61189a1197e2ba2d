//! Feature schema definitions
//!
//! Turns a property mapping into the ordered list of features the classifier
//! is trained on. Every (measure, source property, target property) triple is
//! one numeric feature; a trailing nominal class attribute holds the label.

use crate::error::{LearnError, LearnResult};
use linkspec_core::MetricExpression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Measures computed for every string property pair, in feature order
pub const STRING_MEASURES: [&str; 5] = ["cosine", "jaccard", "jaro", "qgrams", "trigrams"];

/// Measures computed for every date property pair, in feature order
pub const DATE_MEASURES: [&str; 3] = ["datesim", "daysim", "yearsim"];

/// Measures computed for every point-set property pair, in feature order.
/// `geolink` appears twice and yields two identical features.
pub const POINTSET_MEASURES: [&str; 8] = [
    "symmetrichausdorff",
    "frechet",
    "hausdorff",
    "geolink",
    "geomean",
    "geolink",
    "surjection",
    "fairsurjection",
];

/// Name of the class attribute
pub const CLASS_ATTRIBUTE: &str = "match";

/// Measures expanded per property pair, one list per bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureLists {
    pub string: Vec<String>,
    pub date: Vec<String>,
    pub pointset: Vec<String>,
}

impl Default for MeasureLists {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|m| m.to_string()).collect();
        Self {
            string: owned(&STRING_MEASURES),
            date: owned(&DATE_MEASURES),
            pointset: owned(&POINTSET_MEASURES),
        }
    }
}

/// A source property paired with the target property it is compared to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PropertyPair {
    pub source: String,
    pub target: String,
}

impl PropertyPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Comparable property pairs grouped by value type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyMapping {
    #[serde(default)]
    pub string_pairs: Vec<PropertyPair>,
    #[serde(default)]
    pub date_pairs: Vec<PropertyPair>,
    #[serde(default)]
    pub pointset_pairs: Vec<PropertyPair>,
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_string(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.string_pairs.push(PropertyPair::new(source, target));
        self
    }

    #[must_use]
    pub fn with_date(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.date_pairs.push(PropertyPair::new(source, target));
        self
    }

    #[must_use]
    pub fn with_pointset(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.pointset_pairs.push(PropertyPair::new(source, target));
        self
    }

    /// Total number of property pairs across all buckets
    pub fn len(&self) -> usize {
        self.string_pairs.len() + self.date_pairs.len() + self.pointset_pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One numeric feature: a measure over a property pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FeatureDescriptor {
    pub measure: String,
    pub source_property: String,
    pub target_property: String,
}

impl FeatureDescriptor {
    pub fn new(measure: &str, pair: &PropertyPair) -> Self {
        Self {
            measure: measure.to_string(),
            source_property: pair.source.clone(),
            target_property: pair.target.clone(),
        }
    }

    /// The metric expression evaluated to fill this feature
    pub fn expression(&self) -> MetricExpression {
        MetricExpression::new(&self.measure, &self.source_property, &self.target_property)
    }

    /// Attribute name as seen by the classifier, e.g. `jaro§name|label`
    pub fn name(&self) -> String {
        self.expression().feature_name()
    }
}

/// Binary class of a labeled pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Positive,
    Negative,
}

impl ClassLabel {
    /// Class values of the class attribute, in declaration order
    pub const VALUES: [ClassLabel; 2] = [ClassLabel::Positive, ClassLabel::Negative];

    /// `Positive` iff the reference value is exactly 1.0. Fractional
    /// confidences count as non-matches.
    pub fn from_reference_value(value: f64) -> Self {
        if value == 1.0 {
            ClassLabel::Positive
        } else {
            ClassLabel::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLabel::Positive => "positive",
            ClassLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered feature descriptors followed by the implicit class attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureSchema {
    features: Vec<FeatureDescriptor>,
}

impl FeatureSchema {
    /// Build the schema: string pairs, then date pairs, then point-set pairs;
    /// within a bucket pairs in mapping order, each expanded into the bucket's
    /// measures in list order.
    pub fn build(mapping: &PropertyMapping) -> LearnResult<Self> {
        Self::build_with(mapping, &MeasureLists::default())
    }

    /// Same ordering as [`FeatureSchema::build`] with custom measure lists
    pub fn build_with(mapping: &PropertyMapping, measures: &MeasureLists) -> LearnResult<Self> {
        if mapping.is_empty() {
            return Err(LearnError::EmptyMapping);
        }

        let buckets: [(&[PropertyPair], &[String]); 3] = [
            (&mapping.string_pairs, &measures.string),
            (&mapping.date_pairs, &measures.date),
            (&mapping.pointset_pairs, &measures.pointset),
        ];

        let features = buckets
            .iter()
            .flat_map(|(pairs, measures)| {
                pairs.iter().flat_map(move |pair| {
                    measures.iter().map(move |measure| FeatureDescriptor::new(measure, pair))
                })
            })
            .collect();

        Ok(Self { features })
    }

    /// Number of numeric features (the class attribute is not counted)
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[FeatureDescriptor] {
        &self.features
    }

    /// Attribute names in order, the class attribute last
    pub fn attribute_names(&self) -> Vec<String> {
        self.features
            .iter()
            .map(FeatureDescriptor::name)
            .chain(std::iter::once(CLASS_ATTRIBUTE.to_string()))
            .collect()
    }

    /// Index of the class attribute among all attributes
    pub fn class_index(&self) -> usize {
        self.features.len()
    }

    /// Position of the first feature with the given attribute name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name() == name)
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.position(name).map(|i| &self.features[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> PropertyMapping {
        PropertyMapping::new()
            .with_string("name", "label")
            .with_date("born", "birthDate")
            .with_string("title", "title")
            .with_pointset("geo", "geometry")
    }

    #[test]
    fn test_schema_order() {
        let schema = FeatureSchema::build(&mapping()).unwrap();
        assert_eq!(schema.len(), 2 * 5 + 3 + 8);

        let names = schema.attribute_names();
        assert_eq!(names[0], "cosine§name|label");
        assert_eq!(names[4], "trigrams§name|label");
        assert_eq!(names[5], "cosine§title|title");
        assert_eq!(names[10], "datesim§born|birthDate");
        assert_eq!(names[13], "symmetrichausdorff§geo|geometry");
        assert_eq!(names.last().unwrap(), CLASS_ATTRIBUTE);
        assert_eq!(schema.class_index(), 21);
    }

    #[test]
    fn test_schema_deterministic() {
        let first = FeatureSchema::build(&mapping()).unwrap();
        let second = FeatureSchema::build(&mapping()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.attribute_names(), second.attribute_names());
    }

    #[test]
    fn test_empty_mapping_error() {
        assert!(matches!(
            FeatureSchema::build(&PropertyMapping::new()),
            Err(LearnError::EmptyMapping)
        ));
    }

    #[test]
    fn test_duplicate_geolink_kept() {
        let schema = FeatureSchema::build(&PropertyMapping::new().with_pointset("g", "g")).unwrap();
        let geolinks = schema.features().iter().filter(|f| f.measure == "geolink").count();
        assert_eq!(geolinks, 2);
        assert_eq!(schema.position("geolink§g|g"), Some(3));
    }

    #[test]
    fn test_custom_measure_lists() {
        let lists = MeasureLists {
            string: vec!["cosine".into(), "jaccard".into()],
            date: vec![],
            pointset: vec![],
        };
        let schema =
            FeatureSchema::build_with(&PropertyMapping::new().with_string("a", "b").with_date("d", "d"), &lists)
                .unwrap();
        assert_eq!(schema.attribute_names(), ["cosine§a|b", "jaccard§a|b", "match"]);
    }

    #[test]
    fn test_feature_lookup() {
        let schema = FeatureSchema::build(&mapping()).unwrap();
        let feature = schema.feature("jaro§title|title").unwrap();
        assert_eq!(feature.expression().to_string(), "jaro(x.title, y.title)");
        assert!(schema.feature("jaro§nope|nope").is_none());
    }

    #[test]
    fn test_class_label() {
        assert_eq!(ClassLabel::from_reference_value(1.0), ClassLabel::Positive);
        assert_eq!(ClassLabel::from_reference_value(0.0), ClassLabel::Negative);
        assert_eq!(ClassLabel::from_reference_value(0.97), ClassLabel::Negative);
        assert_eq!(ClassLabel::VALUES.map(|l| l.as_str()), ["positive", "negative"]);
    }

    #[test]
    fn test_property_mapping_serde() {
        let json = serde_json::json!({"string_pairs": [{"source": "name", "target": "label"}]});
        let parsed: PropertyMapping = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, PropertyMapping::new().with_string("name", "label"));
        assert_eq!(parsed.len(), 1);
    }
}
