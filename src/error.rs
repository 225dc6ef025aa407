//! Error handling for the resume builder

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeBuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text generation service failed (transport, auth, quota or a malformed reply).
    #[error("Text generation service error: {0}")]
    Service(String),

    /// Laying out or serialising the document failed. No partial document is produced.
    #[error("Document rendering error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResumeBuilderError {
    pub fn is_service_error(&self) -> bool {
        matches!(self, ResumeBuilderError::Service(_))
    }

    pub fn is_render_error(&self) -> bool {
        matches!(self, ResumeBuilderError::Render(_))
    }
}

pub type Result<T> = std::result::Result<T, ResumeBuilderError>;

/// Transport failures surface as service errors carrying the underlying message
impl From<reqwest::Error> for ResumeBuilderError {
    fn from(err: reqwest::Error) -> Self {
        ResumeBuilderError::Service(err.to_string())
    }
}
