//! Frame store error types

/// Error type for frame store operations
#[derive(Debug)]
pub enum StoreError {
    /// No slot has ever been published for the identifier, or the slot
    /// was momentarily missing mid-replace
    NotFound(String),
    /// Empty payload rejected before touching storage
    EmptyPayload,
    /// Underlying storage failure
    Io(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "No frame stored for: {}", key),
            StoreError::EmptyPayload => write!(f, "Empty frame payload"),
            StoreError::Io(e) => write!(f, "Storage I/O failure: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Whether this error means the slot simply does not exist (yet)
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
