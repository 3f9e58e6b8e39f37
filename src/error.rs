//! Error handling for the ATS scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be turned into text at all. The message is
    /// shown to the user verbatim.
    #[error("{0}")]
    Extraction(String),

    #[error("Empty or unreadable resume text")]
    EmptyInput,

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl AtsScorerError {
    /// Whether the error was caused by the caller's input rather than by the
    /// pipeline itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AtsScorerError::EmptyInput
                | AtsScorerError::InvalidInput(_)
                | AtsScorerError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AtsScorerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AtsScorerError {
    fn from(err: anyhow::Error) -> Self {
        AtsScorerError::Processing(err.to_string())
    }
}

/// Regex compilation only fails for malformed built-in patterns
impl From<regex::Error> for AtsScorerError {
    fn from(err: regex::Error) -> Self {
        AtsScorerError::Processing(format!("Failed to compile pattern: {}", err))
    }
}
