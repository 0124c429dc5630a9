//! Error types for gitsync
//!
//! Provides structured error types with context for better debugging
//! and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Fallback text shown when a failed command carried no message of its own.
pub const GENERIC_COMMAND_FAILURE: &str = "Git command failed.";

/// Failure reported by a [`VersionControlClient`](crate::git::VersionControlClient).
///
/// The message is optional: a process may die without writing anything
/// useful, in which case callers fall back to [`GENERIC_COMMAND_FAILURE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(GENERIC_COMMAND_FAILURE))]
pub struct CommandError {
    /// Human-readable failure text, usually the command's stderr
    pub message: Option<String>,
    /// Process exit code, if the process ran at all
    pub exit_code: Option<i32>,
}

impl CommandError {
    /// A failure with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let trimmed = message.trim();
        Self {
            message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            exit_code: None,
        }
    }

    /// A failure with nothing to say for itself
    pub fn without_message() -> Self {
        Self::default()
    }

    /// Attach the process exit code
    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    /// The text to show the user
    pub fn user_message(&self) -> &str {
        self.message.as_deref().unwrap_or(GENERIC_COMMAND_FAILURE)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::with_message(err.to_string())
    }
}

impl From<git2::Error> for CommandError {
    fn from(err: git2::Error) -> Self {
        CommandError::with_message(err.message())
    }
}

/// The main error type for gitsync operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Command Errors
    // ==========================================================================
    #[error("Git command failed: {0}")]
    Command(#[from] CommandError),

    // ==========================================================================
    // Repository Errors
    // ==========================================================================
    #[error("No git repository found at '{path}'")]
    RepositoryNotFound { path: PathBuf },

    #[error("Git operation failed: {message}")]
    Git {
        message: String,
        #[source]
        source: Option<git2::Error>,
    },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ConfigParse { message: String },

    // ==========================================================================
    // IO Errors
    // ==========================================================================
    #[error("IO error: {0}")]
    Io(String),

    // ==========================================================================
    // Catch-all
    // ==========================================================================
    #[error("{0}")]
    Other(String),
}

/// Result type alias for gitsync operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::Git {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Error Display Helpers
// =============================================================================

impl Error {
    /// Returns a user-friendly suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::RepositoryNotFound { .. } => {
                Some("Run from inside a git working copy or pass --repo <path>")
            }
            Error::ConfigParse { .. } => Some("Check .gitsync.yaml for YAML syntax errors"),
            Error::Command(_) => Some("Run the git command by hand to see the full output"),
            _ => None,
        }
    }
}
