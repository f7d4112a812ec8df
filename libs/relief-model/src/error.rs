//! # Model Errors
//!
//! Error types for the dataset-to-model pipeline. Each kind maps to one
//! failure class a caller can react to: bad data, missing assets, transport
//! problems, or a run that was overtaken by a newer one.

use config::constants::ConfigError;
use relief_mesh::MeshError;
use std::fmt;
use thiserror::Error;

/// Which asset failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Font used for the identity and year labels
    Font,
    /// Pre-built base plate mesh
    BaseModel,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Font => f.write_str("font"),
            AssetKind::BaseModel => f.write_str("base model"),
        }
    }
}

/// Errors that can occur while building a relief model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Malformed or inconsistent dataset
    #[error("Data invariant violated: {message}")]
    DataInvariantViolation { message: String },

    /// Font or base model unavailable
    #[error("Failed to load {asset}: {message}")]
    AssetLoadFailure { asset: AssetKind, message: String },

    /// Dataset fetch failed
    #[error("Network failure: {message}")]
    NetworkFailure { message: String },

    /// Label text could not be turned into geometry
    #[error("Label generation failed: {message}")]
    LabelFailure { message: String },

    /// Invalid model dimensions
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Geometry construction failed
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A newer run started before this one finished
    #[error("Run {run} superseded by run {current}")]
    Superseded { run: u64, current: u64 },
}

impl ModelError {
    /// Creates a data invariant violation.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::DataInvariantViolation {
            message: message.into(),
        }
    }

    /// Creates an asset load failure.
    pub fn asset(asset: AssetKind, message: impl Into<String>) -> Self {
        Self::AssetLoadFailure {
            asset,
            message: message.into(),
        }
    }

    /// Creates a network failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    /// Creates a label failure.
    pub fn label(message: impl Into<String>) -> Self {
        Self::LabelFailure {
            message: message.into(),
        }
    }

    /// Whether the run must stop.
    ///
    /// Label problems (including an unusable font) only cost the labels;
    /// everything else aborts the run without producing a model.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ModelError::AssetLoadFailure {
                asset: AssetKind::Font,
                ..
            } | ModelError::LabelFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::invariant("min 5 exceeds max 3");
        assert_eq!(err.to_string(), "Data invariant violated: min 5 exceeds max 3");

        let err = ModelError::asset(AssetKind::BaseModel, "missing file");
        assert_eq!(err.to_string(), "Failed to load base model: missing file");
    }

    #[test]
    fn test_fatality() {
        assert!(!ModelError::asset(AssetKind::Font, "bad font").is_fatal());
        assert!(!ModelError::label("empty outline").is_fatal());
        assert!(ModelError::asset(AssetKind::BaseModel, "gone").is_fatal());
        assert!(ModelError::invariant("negative").is_fatal());
        assert!(ModelError::network("503").is_fatal());
        assert!(ModelError::Superseded { run: 1, current: 2 }.is_fatal());
    }

    #[test]
    fn test_from_mesh_error() {
        let err: ModelError = MeshError::degenerate("flat").into();
        assert!(matches!(err, ModelError::Mesh(_)));
    }

    #[test]
    fn test_from_config_error_keeps_source() {
        let err: ModelError = ConfigError::InvalidFaceAngle(80.0).into();
        assert_eq!(err, ModelError::InvalidConfig(ConfigError::InvalidFaceAngle(80.0)));
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: face angle must be in [90, 180) degrees: 80"
        );
    }
}
