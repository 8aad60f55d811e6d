//! Error types for hoopchat

use thiserror::Error;

/// Errors from config loading, preference storage and other local I/O
///
/// Backend failures are not represented here; they are
/// [`RequestFailure`](crate::answer::RequestFailure)s and end up in the
/// transcript instead of propagating.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON that could not be read or written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Config values that parsed but are not usable
    #[error("Validation error: {0}")]
    Validation(String),

    /// Preference file with unexpected contents
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for hoopchat operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
