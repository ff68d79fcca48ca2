use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Language model call failed: {0}")]
    Capability(String),

    #[error("Failed to access message log: {0}")]
    Persistence(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Console I/O failed: {0}")]
    Console(String),
}

impl From<reqwest::Error> for ChainError {
    fn from(error: reqwest::Error) -> Self {
        ChainError::Capability(error.to_string())
    }
}

impl From<std::io::Error> for ChainError {
    fn from(error: std::io::Error) -> Self {
        ChainError::Persistence(error.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(error: serde_json::Error) -> Self {
        ChainError::Persistence(format!("Malformed log record: {}", error))
    }
}
