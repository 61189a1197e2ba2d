//! # linkspec Learning
//!
//! Active learning of link specifications with a decision-tree classifier.
//!
//! Each round the oracle labels a handful of (source, target) pairs. The
//! labels become feature vectors, an external classifier learns a tree, the
//! tree is translated into a [`RuleTree`](linkspec_core::RuleTree) and its
//! thresholds are relaxed so that executing it surfaces the pairs closest to
//! the decision boundary. Those pairs, minus everything the oracle has
//! already seen, are the next batch.
//!
//! ## Example
//!
//! ```rust
//! use linkspec_core::{MetricExpression, RuleTree};
//! use linkspec_learning::{relax, FeatureSchema, PropertyMapping};
//!
//! let mapping = PropertyMapping::new().with_string("name", "label");
//! let schema = FeatureSchema::build(&mapping).unwrap();
//! assert_eq!(schema.attribute_names()[0], "cosine§name|label");
//!
//! let rule = RuleTree::atomic(MetricExpression::new("jaro", "name", "label"), 0.3);
//! assert_eq!(relax(&rule).threshold(), Some(0.2));
//! ```

pub mod error;
pub mod schema;
pub mod config;
pub mod instances;
pub mod calibrate;
pub mod rank;
pub mod collaborators;
pub mod session;

pub use error::{LearnError, LearnResult};
pub use schema::{ClassLabel, FeatureDescriptor, FeatureSchema, MeasureLists, PropertyMapping, PropertyPair};
pub use config::{ClassifierConfig, LearnerConfig};
pub use instances::{materialize, Instance, TrainingSet, PROBE_THRESHOLD};
pub use calibrate::{relax, relax_with};
pub use rank::{rank_candidates, score_candidates, Candidate, MeasuresUsed, PreviouslyPresented};
pub use collaborators::{Classifier, Collaborators, FallbackLearner, Translation, TreeModel, TreeTranslator};
pub use session::{LearnerKind, RefinementSession, RoundReport, SessionState};
