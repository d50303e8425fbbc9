//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Template error: {0}")]
    Template(#[from] lexform_template::TemplateError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a save collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("{0}")]
    Rejected(String),

    #[error("Save transport failed: {0}")]
    Transport(String),
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Transport(e.to_string())
    }
}

impl From<String> for SaveError {
    fn from(message: String) -> Self {
        SaveError::Rejected(message)
    }
}

impl From<&str> for SaveError {
    fn from(message: &str) -> Self {
        SaveError::Rejected(message.to_string())
    }
}
