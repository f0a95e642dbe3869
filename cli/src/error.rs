//! Error types for the `warden` CLI.
//!
//! Rejected values are not errors: commands report them as an [`Outcome`].
//! A [`CliError`] means the command could not run at all.

use camino::Utf8PathBuf;
use thiserror::Error;
use warden::ConfigError;
use warden_suite::{ModelError, RegistryError};

/// Exit status for a run in which every value was valid.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status for a run in which at least one value was rejected.
pub const EXIT_INVALID: i32 = 1;

/// Exit status for usage, configuration and I/O errors.
pub const EXIT_ERROR: i32 = 2;

/// What a command found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every value was accepted.
    Valid,
    /// At least one value was rejected.
    Invalid,
}

impl Outcome {
    /// Combines the outcomes of two checks.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Valid, Self::Valid) => Self::Valid,
            _ => Self::Invalid,
        }
    }

    /// Returns the process exit status for the outcome.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Valid => EXIT_SUCCESS,
            Self::Invalid => EXIT_INVALID,
        }
    }
}

/// Errors that stop a command before it can report on its input.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Plugin definitions could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The resource model could not be loaded.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The tile document could not be read.
    #[error("failed to read tile {path}: {source}")]
    TileRead {
        /// Path of the tile document.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tile document is not valid tile JSON.
    #[error("failed to parse tile {path}: {source}")]
    TileJson {
        /// Path of the tile document.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The working directory could not be determined.
    #[error("current directory is unavailable: {reason}")]
    CurrentDir {
        /// Description of the failure.
        reason: String,
    },

    /// Output could not be serialised.
    #[error("failed to render JSON output: {0}")]
    Render(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Returns the process exit status for the error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        EXIT_ERROR
    }
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
