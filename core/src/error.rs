use thiserror::Error;

#[derive(Error, Debug)]
pub enum RandomizerError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Random source asked for a non-positive bound: {bound}")]
    NonPositiveBound { bound: i64 },

    #[error("Plan field '{field}': {reason}")]
    Config { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RandomizerError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }
}

pub type RandomizerResult<T> = Result<T, RandomizerError>;
