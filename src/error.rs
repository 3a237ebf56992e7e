//! Crate-level error types

use crate::store::StoreError;

/// Error type for server-level operations
#[derive(Debug)]
pub enum Error {
    /// Socket or serve-loop I/O failure
    Io(std::io::Error),
    /// Frame store failure
    Store(StoreError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Store(e) => write!(f, "Frame store error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Store(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;
