//! Domain types for shotsim-io.

use crate::IoError;

/// A validated comparison name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonName(String);

impl ComparisonName {
    /// Parse and validate a comparison name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidComparisonName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidComparisonName { name });
        }
        Ok(Self(name))
    }

    /// Return the comparison name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComparisonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
