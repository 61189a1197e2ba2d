//! # linkspec
//!
//! Active learning of link specifications.
//!
//! Given two collections of records and a mapping between their properties,
//! linkspec learns a rule tree that decides which record pairs refer to the
//! same entity. An oracle labels a few pairs per round; every round trains a
//! decision tree on the labels, relaxes its thresholds and proposes the
//! unlabeled pairs nearest to the learned boundary as the next batch.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! linkspec schema --mapping mapping.json
//! linkspec relax --rule rule.json
//! linkspec rank --session session.json --batch-size 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use linkspec::prelude::*;
//!
//! let source = RecordCache::from_records(vec![Record::new("s1").with_property("name", "Leipzig")]);
//! let target = RecordCache::from_records(vec![Record::new("t1").with_property("label", "Leipzig")]);
//!
//! let rule = RuleTree::parse_atomic("jaro(x.name, y.label)", 0.95).unwrap();
//! let relaxed = relax(&rule);
//! assert_eq!(relaxed.threshold(), Some(0.85));
//!
//! let links = NestedLoopEngine::new(BuiltinSimilarity).execute(&relaxed, &source, &target);
//! assert!(links.contains("s1", "t1"));
//! ```
//!
//! ## Crate Structure
//!
//! - [`linkspec-core`](https://docs.rs/linkspec-core) - Records, mappings, metric expressions, rule trees
//! - [`linkspec-similarity`](https://docs.rs/linkspec-similarity) - Similarity measures and rule execution
//! - [`linkspec-learning`](https://docs.rs/linkspec-learning) - Feature schema, calibration, ranking, refinement session

// Re-export core types
pub use linkspec_core::{
    Error, Link, Mapping, MetricExpression, Operator, Record, RecordCache, Result, RuleTree,
};

// Re-export similarity
pub use linkspec_similarity::{
    BuiltinSimilarity, ExecutionEngine, Measure, MeasureKind, NestedLoopEngine, SimilarityEngine,
};

// Re-export learning
pub use linkspec_learning::{
    relax, Candidate, Classifier, ClassifierConfig, Collaborators, FallbackLearner, FeatureSchema,
    LearnError, LearnResult, LearnerConfig, MeasuresUsed, PreviouslyPresented, PropertyMapping,
    RefinementSession, RoundReport, TrainingSet, Translation, TreeModel, TreeTranslator,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, Result,
        Link, Mapping, MetricExpression, Operator, Record, RecordCache, RuleTree,
        BuiltinSimilarity, ExecutionEngine, NestedLoopEngine, SimilarityEngine,
        relax, Candidate, ClassifierConfig, Collaborators, FeatureSchema, LearnError, LearnResult,
        LearnerConfig, PropertyMapping, RefinementSession,
    };
}
