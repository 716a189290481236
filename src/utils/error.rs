use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassportError {
    #[error("MRZ parsing error: {0}")]
    MrzParsingError(String),
    #[error("Invalid MRZ character '{0}'")]
    InvalidCharacter(char),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Missing form field: {0}")]
    MissingField(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
