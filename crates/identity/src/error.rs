//! Error types for Mirage identity operations.
//!
//! None of these escape the store lifecycle methods; they are logged and the
//! in-memory profile stays authoritative. They are public so hosts calling
//! [`crate::IdentityStore::save`] directly can react to them.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Store unreadable or unwritable
    #[error("Persistence failure at {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted profile did not parse
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted profile parsed but failed shape checks
    #[error("Corrupt profile: {0}")]
    Corrupt(String),
}

impl IdentityError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IdentityError::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
