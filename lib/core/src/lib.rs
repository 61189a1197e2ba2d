//! # linkspec Core
//!
//! Core data model shared by the linkspec crates.
//!
//! - [`Record`] - A source or target entity with multi-valued properties
//! - [`RecordCache`] - Insertion-ordered collection of records
//! - [`Mapping`] - Ordered (source, target) links with reference values
//! - [`MetricExpression`] - `measure(x.a, y.b)` and its feature name
//! - [`RuleTree`] - Link specification: thresholds combined with AND/OR/XOR/MINUS
//!
//! ## Example
//!
//! ```rust
//! use linkspec_core::{Mapping, MetricExpression, Record, RecordCache, RuleTree};
//!
//! let source = RecordCache::from_records(vec![Record::new("s1").with_property("name", "Leipzig")]);
//! let target = RecordCache::from_records(vec![Record::new("t1").with_property("label", "Leipzig")]);
//!
//! let mut oracle = Mapping::new();
//! oracle.add("s1", "t1", 1.0);
//!
//! let rule = RuleTree::atomic(MetricExpression::parse("jaro(x.name, y.label)").unwrap(), 0.8);
//! assert_eq!(rule.to_string(), "jaro(x.name, y.label)|0.8");
//! # let _ = (source, target);
//! ```

pub mod error;
pub mod record;
pub mod cache;
pub mod mapping;
pub mod metric;
pub mod rule;

pub use error::{Error, Result};
pub use record::Record;
pub use cache::RecordCache;
pub use mapping::{Link, Mapping};
pub use metric::{MetricExpression, FEATURE_DELIMITER, PROPERTY_SEPARATOR};
pub use rule::{Operator, RuleTree};
