use thiserror::Error;

pub type LearnResult<T> = std::result::Result<T, LearnError>;

/// Errors of a learning round.
///
/// None of them ends the session: input errors are reported back to the
/// caller, collaborator failures leave the round without a rule.
#[derive(Error, Debug)]
pub enum LearnError {
    #[error("Property mapping has no attribute pairs")]
    EmptyMapping,

    #[error("No labeled pairs to materialize")]
    EmptyBatch,

    #[error("Oracle mapping is empty")]
    EmptyOracle,

    #[error("Classifier training failed: {0}")]
    ClassifierTraining(String),

    #[error("Tree translation failed: {0}")]
    TreeTranslation(String),

    #[error("Fallback learner failed: {0}")]
    Fallback(String),

    #[error("No rule learned yet")]
    NotTrained,

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(transparent)]
    Core(#[from] linkspec_core::Error),
}

impl LearnError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl ToString) -> Self {
        LearnError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error came from a collaborator rather than from the input
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            LearnError::ClassifierTraining(_) | LearnError::TreeTranslation(_) | LearnError::Fallback(_)
        )
    }
}
