// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for ibadat.
//!
//! Provides error types for iba file operations:
//! - File discovery and sorting
//! - Reader sessions and backend access
//! - Channel resolution and table assembly
//! - Result caching

use std::fmt;
use std::path::Path;

/// Errors that can occur while working with iba files.
#[derive(Debug, Clone)]
pub enum IbaError {
    /// A path does not exist or cannot be accessed
    NotFound {
        /// The missing path
        path: String,
    },

    /// No candidate id of a channel spec resolved to non-empty data
    ChannelNotFound {
        /// The candidate ids that were tried, in order
        candidates: Vec<String>,
        /// File the channels were looked up in
        file: String,
    },

    /// The container is structurally broken
    FileDamaged {
        /// Affected file
        file: String,
        /// What went wrong
        reason: String,
    },

    /// The container is truncated or has not been finalized by the logger
    FileNotComplete {
        /// Affected file
        file: String,
    },

    /// The file is currently being written by the acquisition system
    FileInUse {
        /// Affected file
        file: String,
    },

    /// Columns of incompatible length or kind cannot be assembled into one table
    DataStacking {
        /// Column that failed to stack
        column: String,
        /// What went wrong
        reason: String,
    },

    /// Error surfaced by the reader backend
    Backend {
        /// Backend operation that failed
        operation: String,
        /// Error message
        message: String,
    },

    /// Cache entry could not be written or decoded
    Cache {
        /// Cache file involved
        path: String,
        /// Error message
        message: String,
    },

    /// Underlying I/O error
    Io(String),
}

impl IbaError {
    /// Create a "path not found" error.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        IbaError::NotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Create a "channel not found" error for a list of candidate ids.
    pub fn channel_not_found(candidates: Vec<String>, file: impl AsRef<Path>) -> Self {
        IbaError::ChannelNotFound {
            candidates,
            file: file.as_ref().display().to_string(),
        }
    }

    /// Create a "file damaged" error.
    pub fn damaged(file: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        IbaError::FileDamaged {
            file: file.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Create a "file not complete" error.
    pub fn not_complete(file: impl AsRef<Path>) -> Self {
        IbaError::FileNotComplete {
            file: file.as_ref().display().to_string(),
        }
    }

    /// Create a "file in use" error.
    pub fn in_use(file: impl AsRef<Path>) -> Self {
        IbaError::FileInUse {
            file: file.as_ref().display().to_string(),
        }
    }

    /// Create a data stacking error.
    pub fn stacking(column: impl Into<String>, reason: impl Into<String>) -> Self {
        IbaError::DataStacking {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error.
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        IbaError::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a cache error.
    pub fn cache(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        IbaError::Cache {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            IbaError::NotFound { path } => vec![("path", path.clone())],
            IbaError::ChannelNotFound { candidates, file } => vec![
                ("candidates", candidates.join(", ")),
                ("file", file.clone()),
            ],
            IbaError::FileDamaged { file, reason } => {
                vec![("file", file.clone()), ("reason", reason.clone())]
            }
            IbaError::FileNotComplete { file } => vec![("file", file.clone())],
            IbaError::FileInUse { file } => vec![("file", file.clone())],
            IbaError::DataStacking { column, reason } => {
                vec![("column", column.clone()), ("reason", reason.clone())]
            }
            IbaError::Backend { operation, message } => vec![
                ("operation", operation.clone()),
                ("message", message.clone()),
            ],
            IbaError::Cache { path, message } => {
                vec![("path", path.clone()), ("message", message.clone())]
            }
            IbaError::Io(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for IbaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IbaError::NotFound { path } => {
                write!(f, "Path '{path}' does not exist or cannot be accessed")
            }
            IbaError::ChannelNotFound { candidates, file } => write!(
                f,
                "None of the channel candidates [{}] found in iba file '{file}'",
                candidates.join(", ")
            ),
            IbaError::FileDamaged { file, reason } => {
                write!(f, "iba file '{file}' seems to be damaged: {reason}")
            }
            IbaError::FileNotComplete { file } => write!(
                f,
                "iba file '{file}' has not been completely written by the logger"
            ),
            IbaError::FileInUse { file } => write!(
                f,
                "iba file '{file}' is currently being written by the logger"
            ),
            IbaError::DataStacking { column, reason } => {
                write!(f, "Failed to stack column '{column}': {reason}")
            }
            IbaError::Backend { operation, message } => {
                write!(f, "Backend error during {operation}: {message}")
            }
            IbaError::Cache { path, message } => {
                write!(f, "Cache error for '{path}': {message}")
            }
            IbaError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for IbaError {}

impl From<std::io::Error> for IbaError {
    fn from(err: std::io::Error) -> Self {
        IbaError::Io(err.to_string())
    }
}

/// Result type for ibadat operations.
pub type Result<T> = std::result::Result<T, IbaError>;
