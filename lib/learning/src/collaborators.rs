//! Capability interfaces of the external learners the session drives.
//!
//! The session never induces trees itself. It hands a [`TrainingSet`] to a
//! [`Classifier`], serializes the returned [`TreeModel`] to prefix notation,
//! and lets a [`TreeTranslator`] turn that text back into a [`RuleTree`].
//! When the labels are uniform the round goes to a [`FallbackLearner`].
//!
//! Implementations report failures through `anyhow`; the session logs them
//! and turns them into [`crate::LearnError`] values.

use crate::config::ClassifierConfig;
use crate::instances::TrainingSet;
use crate::rank::MeasuresUsed;
use crate::schema::FeatureSchema;
use linkspec_core::{Mapping, RecordCache, RuleTree};
use linkspec_similarity::{BuiltinSimilarity, ExecutionEngine, NestedLoopEngine, SimilarityEngine};
use std::sync::Arc;

/// Trains a binary decision tree on a materialized training set
pub trait Classifier: Send {
    fn train(
        &mut self,
        data: &TrainingSet,
        config: &ClassifierConfig,
    ) -> anyhow::Result<Box<dyn TreeModel>>;
}

/// A trained tree model
pub trait TreeModel: Send {
    /// Prefix-notation rendering of the tree, attribute names as in the schema
    fn to_prefix(&self) -> anyhow::Result<String>;
}

/// Output of tree translation
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub rule: RuleTree,
    /// Every measure the tree splits on with its split threshold
    pub measures_used: MeasuresUsed,
}

/// Turns a prefix-notation tree into a rule tree
pub trait TreeTranslator: Send + Sync {
    fn parse_prefix(&self, prefix: &str, schema: &FeatureSchema) -> anyhow::Result<Translation>;
}

/// Alternate active learner used when the labeled batch holds a single class
pub trait FallbackLearner: Send {
    /// Bind the learner to the record caches, dropping any prior state
    fn initialize(&mut self, source: &RecordCache, target: &RecordCache) -> anyhow::Result<()>;

    /// First unsupervised pass with no labeled data
    fn warm_start(&mut self) -> anyhow::Result<()>;

    /// Learn from the labeled batch and return the resulting rule
    fn train_on_labeled(&mut self, labeled: &Mapping) -> anyhow::Result<RuleTree>;
}

/// Everything a session calls out to
pub struct Collaborators {
    pub similarity: Arc<dyn SimilarityEngine>,
    pub execution: Box<dyn ExecutionEngine>,
    pub classifier: Box<dyn Classifier>,
    pub translator: Box<dyn TreeTranslator>,
    pub fallback: Box<dyn FallbackLearner>,
}

impl Collaborators {
    /// Built-in similarity and nested-loop execution, external learners supplied
    pub fn with_builtin_engines(
        classifier: Box<dyn Classifier>,
        translator: Box<dyn TreeTranslator>,
        fallback: Box<dyn FallbackLearner>,
    ) -> Self {
        Self {
            similarity: Arc::new(BuiltinSimilarity),
            execution: Box::new(NestedLoopEngine::new(BuiltinSimilarity)),
            classifier,
            translator,
            fallback,
        }
    }

    #[must_use]
    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityEngine>) -> Self {
        self.similarity = similarity;
        self
    }

    #[must_use]
    pub fn with_execution(mut self, execution: Box<dyn ExecutionEngine>) -> Self {
        self.execution = execution;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
