//! Learner configuration
//!
//! Hyperparameters of the decision-tree classifier plus the inputs of a
//! session (property mapping, optional initial mapping and rule). Values can
//! be loaded from JSON or set one at a time by their display name.

use crate::error::{LearnError, LearnResult};
use crate::schema::PropertyMapping;
use linkspec_core::{Mapping, RuleTree};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info};

pub const PARAMETER_TRAINING_SIZE: &str = "training data size";
pub const PARAMETER_UNPRUNED_TREE: &str = "use unpruned tree";
pub const PARAMETER_COLLAPSE_TREE: &str = "collapse tree";
pub const PARAMETER_PRUNING_CONFIDENCE: &str = "confidence threshold for pruning";
pub const PARAMETER_REDUCED_ERROR_PRUNING: &str = "reduced error pruning";
pub const PARAMETER_FOLD_NUMBER: &str = "number of folds for reduced error pruning";
pub const PARAMETER_SUBTREE_RAISING: &str = "perform subtree raising";
pub const PARAMETER_CLEAN_UP: &str = "clean up after building tree";
pub const PARAMETER_LAPLACE_SMOOTHING: &str = "laplace smoothing for predicted probabilities";
pub const PARAMETER_MDL_CORRECTION: &str = "MDL correction for predicted probabilities";
pub const PARAMETER_SEED: &str = "seed for random data shuffling";
pub const PARAMETER_PROPERTY_MAPPING: &str = "property mapping";
pub const PARAMETER_MAPPING: &str = "initial mapping as training data";
pub const PARAMETER_LINK_SPECIFICATION: &str = "initial link specification to start training";

/// Every parameter name accepted by [`LearnerConfig::set_parameter`]
pub const PARAMETER_NAMES: [&str; 14] = [
    PARAMETER_TRAINING_SIZE,
    PARAMETER_UNPRUNED_TREE,
    PARAMETER_COLLAPSE_TREE,
    PARAMETER_PRUNING_CONFIDENCE,
    PARAMETER_REDUCED_ERROR_PRUNING,
    PARAMETER_FOLD_NUMBER,
    PARAMETER_SUBTREE_RAISING,
    PARAMETER_CLEAN_UP,
    PARAMETER_LAPLACE_SMOOTHING,
    PARAMETER_MDL_CORRECTION,
    PARAMETER_SEED,
    PARAMETER_PROPERTY_MAPPING,
    PARAMETER_MAPPING,
    PARAMETER_LINK_SPECIFICATION,
];

/// Upper bound on the reduced-error-pruning fold count
pub const MAX_FOLD_COUNT: u32 = 10;

/// Decision-tree hyperparameters, range-checked and otherwise passed through to
/// the classifier untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub unpruned: bool,
    pub collapse_tree: bool,
    pub pruning_confidence: f64,
    pub reduced_error_pruning: bool,
    pub fold_count: u32,
    pub subtree_raising: bool,
    pub clean_up: bool,
    pub laplace_smoothing: bool,
    pub mdl_correction: bool,
    pub seed: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            unpruned: false,
            collapse_tree: true,
            pruning_confidence: 0.25,
            reduced_error_pruning: false,
            fold_count: 3,
            subtree_raising: true,
            clean_up: true,
            laplace_smoothing: false,
            mdl_correction: true,
            seed: 1,
        }
    }
}

impl ClassifierConfig {
    /// Command-line style option flags for a C4.5 style tree learner.
    /// Only settings that differ from the learner's own defaults are emitted.
    pub fn to_options(&self) -> Vec<String> {
        let defaults = Self::default();
        let mut options = Vec::new();

        if self.unpruned {
            options.push("-U".to_string());
        }
        if !self.collapse_tree {
            options.push("-O".to_string());
        }
        if self.pruning_confidence != defaults.pruning_confidence {
            options.push("-C".to_string());
            options.push(self.pruning_confidence.to_string());
        }
        if self.reduced_error_pruning {
            options.push("-R".to_string());
        }
        if self.fold_count != defaults.fold_count {
            options.push("-N".to_string());
            options.push(self.fold_count.to_string());
        }
        if !self.subtree_raising {
            options.push("-S".to_string());
        }
        if !self.clean_up {
            options.push("-L".to_string());
        }
        if self.laplace_smoothing {
            options.push("-A".to_string());
        }
        if !self.mdl_correction {
            options.push("-J".to_string());
        }
        if self.seed != defaults.seed {
            options.push("-Q".to_string());
            options.push(self.seed.to_string());
        }

        options
    }

    pub fn validate(&self) -> LearnResult<()> {
        if !(0.0..=1.0).contains(&self.pruning_confidence) {
            return Err(LearnError::invalid_parameter(
                PARAMETER_PRUNING_CONFIDENCE,
                format!("{} is outside [0, 1]", self.pruning_confidence),
            ));
        }
        if self.fold_count > MAX_FOLD_COUNT {
            return Err(LearnError::invalid_parameter(
                PARAMETER_FOLD_NUMBER,
                format!("{} is outside [0, {}]", self.fold_count, MAX_FOLD_COUNT),
            ));
        }
        Ok(())
    }
}

/// Full configuration of a refinement session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Number of candidates handed to the oracle per round
    pub training_batch_size: usize,
    #[serde(flatten)]
    pub classifier: ClassifierConfig,
    pub property_mapping: PropertyMapping,
    /// Labeled pairs available before the first round
    pub initial_mapping: Mapping,
    /// Rule executed to seed training when no initial mapping is given
    pub initial_rule: Option<RuleTree>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            training_batch_size: 10,
            classifier: ClassifierConfig::default(),
            property_mapping: PropertyMapping::default(),
            initial_mapping: Mapping::new(),
            initial_rule: None,
        }
    }
}

impl LearnerConfig {
    pub fn new(property_mapping: PropertyMapping) -> Self {
        Self {
            property_mapping,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> LearnResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(linkspec_core::Error::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> LearnResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(linkspec_core::Error::from)?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), "Loaded learner configuration");
        Ok(config)
    }

    pub fn validate(&self) -> LearnResult<()> {
        if self.training_batch_size == 0 {
            return Err(LearnError::invalid_parameter(
                PARAMETER_TRAINING_SIZE,
                "batch size must be positive",
            ));
        }
        if let Some(rule) = &self.initial_rule {
            rule.validate()?;
        }
        self.classifier.validate()
    }

    /// Set one parameter by its display name.
    ///
    /// An unknown name resets the whole configuration to its defaults and is
    /// reported as [`LearnError::InvalidParameter`]. A known name with a value
    /// of the wrong shape or out of range leaves the configuration unchanged.
    pub fn set_parameter(&mut self, name: &str, value: serde_json::Value) -> LearnResult<()> {
        match name {
            PARAMETER_TRAINING_SIZE => self.training_batch_size = parse_value(name, value)?,
            PARAMETER_UNPRUNED_TREE => self.classifier.unpruned = parse_value(name, value)?,
            PARAMETER_COLLAPSE_TREE => self.classifier.collapse_tree = parse_value(name, value)?,
            PARAMETER_PRUNING_CONFIDENCE => {
                let mut classifier = self.classifier.clone();
                classifier.pruning_confidence = parse_value(name, value)?;
                classifier.validate()?;
                self.classifier = classifier;
            }
            PARAMETER_REDUCED_ERROR_PRUNING => {
                self.classifier.reduced_error_pruning = parse_value(name, value)?
            }
            PARAMETER_FOLD_NUMBER => {
                let mut classifier = self.classifier.clone();
                classifier.fold_count = parse_value(name, value)?;
                classifier.validate()?;
                self.classifier = classifier;
            }
            PARAMETER_SUBTREE_RAISING => {
                self.classifier.subtree_raising = parse_value(name, value)?
            }
            PARAMETER_CLEAN_UP => self.classifier.clean_up = parse_value(name, value)?,
            PARAMETER_LAPLACE_SMOOTHING => {
                self.classifier.laplace_smoothing = parse_value(name, value)?
            }
            PARAMETER_MDL_CORRECTION => self.classifier.mdl_correction = parse_value(name, value)?,
            PARAMETER_SEED => self.classifier.seed = parse_value(name, value)?,
            PARAMETER_PROPERTY_MAPPING => self.property_mapping = parse_value(name, value)?,
            PARAMETER_MAPPING => self.initial_mapping = parse_value(name, value)?,
            PARAMETER_LINK_SPECIFICATION => self.initial_rule = Some(parse_value(name, value)?),
            _ => {
                error!(parameter = name, "Unknown parameter, resetting configuration to defaults");
                *self = Self::default();
                return Err(LearnError::invalid_parameter(name, "unknown parameter"));
            }
        }
        Ok(())
    }
}

fn parse_value<T: DeserializeOwned>(name: &str, value: serde_json::Value) -> LearnResult<T> {
    serde_json::from_value(value).map_err(|e| LearnError::invalid_parameter(name, e))
}
