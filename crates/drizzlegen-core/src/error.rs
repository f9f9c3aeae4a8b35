//! Core error types.

use thiserror::Error;

/// Errors that abort schema generation.
///
/// Unknown SQL types, unrecognized defaults and partial numeric precision are
/// not errors; they degrade during mapping instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The metadata client exited with a non-zero status.
    #[error("metadata fetch failed ({status}): {stderr}")]
    MetadataFetch {
        /// Exit status as reported by the OS.
        status: String,
        /// Raw diagnostic output of the client.
        stderr: String,
    },

    /// The metadata client could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading metadata.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata document is not valid JSON or has the wrong shape.
    #[error("invalid metadata document: {0}")]
    Json(#[from] serde_json::Error),

    /// Metadata document is well-formed but inconsistent.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Schema name is not a plain identifier.
    #[error("invalid schema name: {0:?}")]
    InvalidSchemaName(String),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
