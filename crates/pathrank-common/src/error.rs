use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathrankError {
    #[error("Malformed pathway hit '{id}': {reason}")]
    MalformedHit { id: String, reason: String },

    #[error("Configuration error in `{parameter}`: {message}")]
    Config { parameter: String, message: String },

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PathrankError {
    /// Shorthand for a configuration error naming the offending parameter.
    pub fn config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedHit {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PathrankError>;
