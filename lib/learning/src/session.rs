//! The refinement session: one learning round per oracle batch.
//!
//! A round merges the oracle's judgements into the previously-presented set,
//! materializes features, learns a rule (decision tree, or the fallback
//! learner on uniform labels) and relaxes it. Between rounds
//! [`RefinementSession::select_next`] proposes the pairs the oracle should
//! judge next.

use crate::calibrate::relax;
use crate::collaborators::{Collaborators, Translation};
use crate::config::LearnerConfig;
use crate::error::{LearnError, LearnResult};
use crate::instances::{materialize, TrainingSet};
use crate::rank::{
    measures_from_rule, rank_candidates, score_candidates, Candidate, MeasuresUsed, PreviouslyPresented,
};
use crate::schema::FeatureSchema;
use linkspec_core::{Mapping, RecordCache, RuleTree};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Which learner produced a round's rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerKind {
    DecisionTree,
    Fallback,
}

/// Summary of a completed round
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub round: usize,
    pub learner: LearnerKind,
    pub rule: RuleTree,
    pub relaxed_rule: RuleTree,
    pub instances: usize,
    pub positives: usize,
    pub diverse: bool,
}

/// Mutable state carried from one round to the next
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub schema: Option<FeatureSchema>,
    pub best: Option<RuleTree>,
    pub relaxed: Option<RuleTree>,
    pub measures_used: MeasuresUsed,
    pub presented: PreviouslyPresented,
    pub rounds: usize,
}

/// A single active-learning session over two record caches
#[derive(Debug)]
pub struct RefinementSession {
    config: LearnerConfig,
    source: RecordCache,
    target: RecordCache,
    collaborators: Collaborators,
    state: SessionState,
}

impl RefinementSession {
    pub fn new(
        config: LearnerConfig,
        source: RecordCache,
        target: RecordCache,
        collaborators: Collaborators,
    ) -> LearnResult<Self> {
        config.validate()?;
        info!(
            source_records = source.len(),
            target_records = target.len(),
            property_pairs = config.property_mapping.len(),
            "Starting refinement session"
        );
        Ok(Self {
            config,
            source,
            target,
            collaborators,
            state: SessionState::default(),
        })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn best_rule(&self) -> Option<&RuleTree> {
        self.state.best.as_ref()
    }

    pub fn relaxed_rule(&self) -> Option<&RuleTree> {
        self.state.relaxed.as_ref()
    }

    pub fn schema(&self) -> Option<&FeatureSchema> {
        self.state.schema.as_ref()
    }

    pub fn measures_used(&self) -> &MeasuresUsed {
        &self.state.measures_used
    }

    pub fn previously_presented(&self) -> &PreviouslyPresented {
        &self.state.presented
    }

    pub fn rounds(&self) -> usize {
        self.state.rounds
    }

    /// Run one learning round on the oracle's latest judgements.
    ///
    /// Input errors and collaborator failures are returned without touching
    /// the current rules; the session stays usable either way.
    pub fn refine(&mut self, oracle: &Mapping) -> LearnResult<RoundReport> {
        if oracle.is_empty() {
            warn!("Refinement called with an empty oracle mapping");
            return Err(LearnError::EmptyOracle);
        }

        self.state.presented.extend_from(oracle);

        let schema = FeatureSchema::build(&self.config.property_mapping)?;
        let data = materialize(
            &schema,
            oracle,
            &self.source,
            &self.target,
            self.collaborators.similarity.as_ref(),
        )?;
        self.state.schema = Some(schema);

        let (learner, translation) = if data.is_diverse() {
            (LearnerKind::DecisionTree, self.learn_tree(&data)?)
        } else {
            warn!(
                instances = data.len(),
                positives = data.positives(),
                "Training data holds a single class, using the fallback learner"
            );
            (LearnerKind::Fallback, self.learn_fallback(oracle)?)
        };

        let relaxed = relax(&translation.rule);
        self.state.rounds += 1;
        info!(
            round = self.state.rounds,
            learner = ?learner,
            rule = %translation.rule,
            relaxed = %relaxed,
            "Refinement round complete"
        );

        let report = RoundReport {
            round: self.state.rounds,
            learner,
            rule: translation.rule.clone(),
            relaxed_rule: relaxed.clone(),
            instances: data.len(),
            positives: data.positives(),
            diverse: data.is_diverse(),
        };

        self.state.best = Some(translation.rule);
        self.state.relaxed = Some(relaxed);
        self.state.measures_used = translation.measures_used;
        Ok(report)
    }

    fn learn_tree(&mut self, data: &TrainingSet) -> LearnResult<Translation> {
        let model = self
            .collaborators
            .classifier
            .train(data, &self.config.classifier)
            .map_err(|e| {
                error!(error = %e, "Classifier training failed");
                LearnError::ClassifierTraining(e.to_string())
            })?;

        let translation = model
            .to_prefix()
            .and_then(|prefix| {
                debug!(tree = %prefix, "Trained decision tree");
                self.collaborators.translator.parse_prefix(&prefix, &data.schema)
            })
            .map_err(|e| {
                error!(error = %e, "Tree translation failed");
                LearnError::TreeTranslation(e.to_string())
            })?;

        Ok(translation)
    }

    fn learn_fallback(&mut self, oracle: &Mapping) -> LearnResult<Translation> {
        let fallback = &mut self.collaborators.fallback;
        let rule = fallback
            .initialize(&self.source, &self.target)
            .and_then(|()| fallback.warm_start())
            .and_then(|()| fallback.train_on_labeled(oracle))
            .map_err(|e| {
                error!(error = %e, "Fallback learner failed");
                LearnError::Fallback(e.to_string())
            })?;

        let measures_used = measures_from_rule(&rule);
        Ok(Translation {
            rule,
            measures_used,
        })
    }

    /// The `batch_size` unjudged pairs closest to the decision boundary.
    ///
    /// A zero batch size returns nothing without running the relaxed rule.
    pub fn select_next(&self, batch_size: usize) -> LearnResult<Vec<Candidate>> {
        if batch_size == 0 {
            info!("Zero examples requested, returning an empty batch");
            return Ok(Vec::new());
        }
        let relaxed = self.state.relaxed.as_ref().ok_or(LearnError::NotTrained)?;

        let mapping = self.collaborators.execution.execute(relaxed, &self.source, &self.target);
        let candidates = score_candidates(
            &mapping,
            &self.source,
            &self.target,
            &self.state.measures_used,
            self.collaborators.similarity.as_ref(),
        );
        let batch = rank_candidates(candidates, &self.state.presented, batch_size);
        info!(
            accepted = mapping.len(),
            selected = batch.len(),
            "Selected next examples"
        );
        Ok(batch)
    }

    /// [`RefinementSession::select_next`] with the configured batch size
    pub fn next_examples(&self) -> LearnResult<Vec<Candidate>> {
        self.select_next(self.config.training_batch_size)
    }

    /// Labeled data to start from: the configured initial mapping, else the
    /// pairs accepted by the configured initial rule.
    pub fn initial_training_mapping(&self) -> Option<Mapping> {
        if !self.config.initial_mapping.is_empty() {
            return Some(self.config.initial_mapping.clone());
        }
        match &self.config.initial_rule {
            Some(rule) => {
                let mapping = self.collaborators.execution.execute(rule, &self.source, &self.target);
                info!(links = mapping.len(), rule = %rule, "Seeded training data from the initial rule");
                Some(mapping)
            }
            None => {
                error!("Neither an initial mapping nor an initial rule is configured");
                None
            }
        }
    }

    /// Links accepted by the current best rule
    pub fn predict(&self) -> LearnResult<Mapping> {
        let best = self.state.best.as_ref().ok_or(LearnError::NotTrained)?;
        Ok(self.collaborators.execution.execute(best, &self.source, &self.target))
    }
}
