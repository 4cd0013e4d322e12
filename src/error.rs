use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Prompt refinement failed: {0}")]
    RefinementError(String),
    #[error("Image generation failed: {0}")]
    GenerationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// True for failures that must end the process with a non-zero status.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GenError::ConfigError(_) | GenError::RefinementError(_))
    }
}

impl From<reqwest::Error> for GenError {
    fn from(e: reqwest::Error) -> Self {
        GenError::RequestError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
