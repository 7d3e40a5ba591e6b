use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for tokei-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Pattern not found in {path}: expected {pattern}")]
    PatternDrift { path: PathBuf, pattern: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience type alias for Results in tokei-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a render error with context
    pub fn render(msg: impl Into<String>) -> Self {
        ReleaseError::Render(msg.into())
    }

    /// Process exit code for the dashboard renderer.
    ///
    /// Configuration and version problems exit 10, output problems
    /// (missing stats, unreadable JSON, template or write failures) exit 13.
    /// The bump tool does not use this mapping; it always exits 1 on failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Config(_) | ReleaseError::Version(_) | ReleaseError::Toml(_) => 10,
            ReleaseError::Render(_) | ReleaseError::Io(_) | ReleaseError::Json(_) => 13,
            _ => 1,
        }
    }
}
