//! Error types for the SIGMA query backend.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SigmaError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SigmaError {
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("Unknown aggregation expression")]
    UnknownExpression,
    #[error("Unsupported aggregation function")]
    UnsupportedAggregationFunction,
    /// A sub-condition of a rule failed to translate.
    #[error("Condition {index}: {source}")]
    Condition {
        index: usize,
        source: Box<SigmaError>,
    },
    #[error("IO error: {0}")]
    IoError(String),
    #[error("YAML parsing error: {0}")]
    YamlError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl SigmaError {
    /// Attach the index of the sub-condition that produced this error.
    pub fn at_condition(self, index: usize) -> Self {
        SigmaError::Condition {
            index,
            source: Box::new(self),
        }
    }

    /// The error with any condition attribution stripped.
    pub fn root(&self) -> &SigmaError {
        match self {
            SigmaError::Condition { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::io::Error> for SigmaError {
    fn from(err: std::io::Error) -> Self {
        SigmaError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for SigmaError {
    fn from(err: serde_yaml::Error) -> Self {
        SigmaError::YamlError(err.to_string())
    }
}
