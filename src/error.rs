//! Error types for smartbot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartbotError {
    #[error("context has {actual} features, engine expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unknown action: {0}")]
    UnknownArm(String),

    #[error("non-finite input: {0}")]
    NonFiniteInput(String),

    #[error("statistics for arm {arm} are not positive definite")]
    SingularMatrix { arm: String },

    #[error("state shape mismatch: {0}")]
    StateShape(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("timed out waiting for lock: {0}")]
    LockTimeout(String),
}

impl SmartbotError {
    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::UnknownArm(_) => "unknown_arm",
            Self::NonFiniteInput(_) => "invalid_input",
            Self::SingularMatrix { .. } => "singular_matrix",
            Self::StateShape(_) | Self::Io(_) | Self::Serialization(_) | Self::LockTimeout(_) => {
                "persistence"
            }
            Self::Config(_) | Self::MissingConfig(_) => "config",
        }
    }
}

impl From<serde_json::Error> for SmartbotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SmartbotError>;
