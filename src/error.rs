use thiserror::Error;

/// Unified error type for magikarp operations
#[derive(Error, Debug)]
pub enum MagikarpError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid tag version '{tag}': {reason}")]
    InvalidTagVersion { tag: String, reason: String },

    #[error("No version tags found")]
    NoTagsFound,

    #[error("Replacement failed: pattern '{expression}' did not match in {path}")]
    ReplacementFailed { path: String, expression: String },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in magikarp
pub type Result<T> = std::result::Result<T, MagikarpError>;

impl MagikarpError {
    /// Create an invalid version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        MagikarpError::InvalidVersion(msg.into())
    }

    /// Create an invalid tag error for a specific tag
    pub fn tag(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        MagikarpError::InvalidTagVersion {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        MagikarpError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MagikarpError::Config(msg.into())
    }

    /// Create a replacement error for a pattern that matched nothing
    pub fn replacement(path: impl Into<String>, expression: impl Into<String>) -> Self {
        MagikarpError::ReplacementFailed {
            path: path.into(),
            expression: expression.into(),
        }
    }
}
