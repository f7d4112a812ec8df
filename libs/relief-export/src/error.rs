//! # Export Errors
//!
//! Writing never fails; these errors come from reading STL data back.

use thiserror::Error;

/// Errors that can occur while decoding STL data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// Binary data ends before the declared content
    #[error("Truncated STL: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    /// ASCII data does not follow the solid/facet grammar
    #[error("Malformed STL at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Binary triangle count disagrees with the payload size
    #[error("STL declares {declared} triangles but holds {actual}")]
    CountMismatch { declared: u32, actual: usize },

    /// Neither ASCII nor binary STL
    #[error("Unrecognized STL data")]
    UnknownFormat,
}

impl ExportError {
    /// Creates a malformed-input error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::malformed(3, "expected 'vertex'");
        assert_eq!(err.to_string(), "Malformed STL at line 3: expected 'vertex'");

        let err = ExportError::CountMismatch {
            declared: 4,
            actual: 2,
        };
        assert!(err.to_string().contains("4 triangles"));
    }
}
