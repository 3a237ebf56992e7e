//! Camera identifiers and storage-key normalization
//!
//! Raw identifiers arrive from URLs and are not trusted as file names.
//! Only ASCII alphanumerics, `-` and `_` survive normalization; everything
//! else is stripped before the identifier touches the filesystem.

/// Identifier for one frame source (typically a camera)
///
/// Holds the raw identifier as received; [`SourceId::storage_key`] derives
/// the normalized form used on disk. Two raw identifiers that normalize to
/// the same key address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId {
    raw: String,
}

impl SourceId {
    /// Create a new source identifier from a raw string
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The identifier as received
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized storage key: ASCII alphanumerics, `-` and `_` only
    pub fn storage_key(&self) -> String {
        self.raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect()
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for SourceId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
