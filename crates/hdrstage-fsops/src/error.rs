//! # Design
//!
//! - Provide structured, constant-message errors for the staging pipeline.
//! - Capture the offending path so failures are reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for staging operations.
pub type StageResult<T> = Result<T, StageError>;

/// Errors produced while staging headers.
#[derive(Debug, Error)]
pub enum StageError {
    /// The source file of a copy task does not exist.
    #[error("stage source file not found")]
    FileNotFound {
        /// Missing source path.
        path: PathBuf,
    },
    /// The destination could not be written (unwritable or missing parent directory).
    #[error("stage destination write failed")]
    WriteError {
        /// Destination path that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// An existing file could not be read while comparing contents.
    #[error("stage content read failed")]
    ReadError {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The module path has no parent directory to resolve sources against.
    #[error("stage module path has no parent directory")]
    InvalidModulePath {
        /// Offending module path.
        path: PathBuf,
    },
}

impl StageError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Path the failure is attributed to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileNotFound { path }
            | Self::WriteError { path, .. }
            | Self::ReadError { path, .. }
            | Self::InvalidModulePath { path } => path,
        }
    }
}
