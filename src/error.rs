//! Error types for partifact operations.

use thiserror::Error;

/// Result type alias using [`PartifactError`].
pub type Result<T> = std::result::Result<T, PartifactError>;

/// Errors that can occur while resolving, authenticating or configuring.
///
/// None of these are retried. They propagate to the top level, where the
/// binary prints the message and exits with [`PartifactError::exit_code`].
#[derive(Debug, Error)]
pub enum PartifactError {
    /// Configuration file missing, unreadable, or repository not present.
    #[error("configuration not found: {0}")]
    ConfigNotFound(String),

    /// Repository record found but mandatory fields are missing.
    #[error("incomplete configuration for {repository}: missing fields {}", missing.join(", "))]
    IncompleteConfig {
        /// Repository being resolved
        repository: String,
        /// Every mandatory field that was absent or empty
        missing: Vec<String>,
    },

    /// A value does not match the expected format.
    #[error("invalid format: {message} (expected {expected})")]
    InvalidFormat {
        /// What was wrong
        message: String,
        /// The template or shape that was expected
        expected: String,
    },

    /// Credential exchange or token request was rejected.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// External command could not be run or exited non-zero.
    #[error("{program} failed with exit code {code}: {stderr}")]
    ShellCommandFailure {
        /// Program that was executed
        program: String,
        /// Exit code, `-1` when the process was killed or never started
        code: i32,
        /// Captured error output
        stderr: String,
    },

    /// Configuring a package manager failed.
    #[error("failed to configure {target}: {source}")]
    Configure {
        /// Package manager being configured (pip, poetry)
        target: String,
        /// Underlying error
        #[source]
        source: Box<PartifactError>,
    },
}

impl PartifactError {
    /// Creates an [`InvalidFormat`](Self::InvalidFormat) error.
    pub fn invalid_format(message: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
            expected: expected.into(),
        }
    }

    /// Wraps an error with the package manager that was being configured.
    ///
    /// # Example
    ///
    /// ```
    /// use partifact::PartifactError;
    ///
    /// let err = PartifactError::ShellCommandFailure {
    ///     program: "pip".to_string(),
    ///     code: 1,
    ///     stderr: "boom".to_string(),
    /// };
    /// let wrapped = PartifactError::configure("pip", err);
    ///
    /// assert_eq!(
    ///     wrapped.to_string(),
    ///     "failed to configure pip: pip failed with exit code 1: boom"
    /// );
    /// assert_eq!(wrapped.kind(), "ShellCommandFailure");
    /// ```
    pub fn configure(target: impl Into<String>, err: PartifactError) -> Self {
        Self::Configure {
            target: target.into(),
            source: Box::new(err),
        }
    }

    /// Returns the name of the error kind.
    ///
    /// Context wrappers report the kind of the error they wrap.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigNotFound(_) => "ConfigNotFound",
            Self::IncompleteConfig { .. } => "IncompleteConfig",
            Self::InvalidFormat { .. } => "InvalidFormat",
            Self::AuthFailure(_) => "AuthFailure",
            Self::ShellCommandFailure { .. } => "ShellCommandFailure",
            Self::Configure { source, .. } => source.kind(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigNotFound(_) => 2,
            Self::IncompleteConfig { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::AuthFailure(_) => 5,
            Self::ShellCommandFailure { .. } => 6,
            Self::Configure { source, .. } => source.exit_code(),
        }
    }
}
