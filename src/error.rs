//! Error taxonomy for a single fetch invocation
//!
//! Every failure is terminal. The variant decides the process exit code:
//! usage and configuration problems exit with `1`, anything that happens
//! once the tool starts talking to the database exits with `2`.

use thiserror::Error;

/// Exit code for usage errors and missing configuration
pub const EXIT_USAGE: i32 = 1;

/// Exit code for runtime failures (auth, network, serialization)
pub const EXIT_RUNTIME: i32 = 2;

#[derive(Debug, Error)]
pub enum FetchError {
    /// No database path was given on the command line.
    #[error("missing database path argument")]
    Usage,

    /// A required environment variable is unset or empty.
    #[error("Environment variable {name} must be set")]
    MissingEnv { name: &'static str },

    /// Building the authenticated client failed.
    #[error("Error {context}: {cause:#}")]
    Init {
        context: &'static str,
        cause: anyhow::Error,
    },

    /// The remote read failed.
    #[error("Error reading from database: {0:#}")]
    Read(anyhow::Error),

    /// The fetched value could not be re-encoded as JSON.
    #[error("Error marshalling data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn init(context: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        FetchError::Init {
            context,
            cause: cause.into(),
        }
    }

    pub fn read(source: impl Into<anyhow::Error>) -> Self {
        FetchError::Read(source.into())
    }

    /// Return the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage | Self::MissingEnv { .. } => EXIT_USAGE,
            Self::Init { .. } | Self::Read(_) | Self::Encode(_) => EXIT_RUNTIME,
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
