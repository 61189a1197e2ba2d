use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid metric expression: {0}")]
    InvalidExpression(String),

    #[error("Invalid feature name: {0}")]
    InvalidFeatureName(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
