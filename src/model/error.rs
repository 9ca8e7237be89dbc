//! Error types for loading and calling regression artifacts.

use crate::preprocessing::error::PreprocessingError;
use std::fmt;
use std::path::PathBuf;

/// Failure to resolve or load a regression artifact.
#[derive(Debug)]
pub enum ModelLoadError {
    /// Model name not present in the registry.
    UnknownModel {
        name: String,
        available: Vec<String>,
    },
    /// Artifact file does not exist.
    NotFound { path: PathBuf },
    /// Artifact file exists but could not be read.
    Io { path: PathBuf, message: String },
    /// Artifact bytes do not decode.
    Corrupt { path: PathBuf, message: String },
    /// Embedded version differs from the one requested.
    VersionMismatch { expected: String, found: String },
    /// Embedded feature layout differs from the crate's.
    SchemaMismatch(String),
    /// Fitted preprocessing state could not be built or loaded.
    Preprocessing(PreprocessingError),
}

impl fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLoadError::UnknownModel { name, available } => write!(
                f,
                "Unknown model '{}' (available: {})",
                name,
                available.join(", ")
            ),
            ModelLoadError::NotFound { path } => {
                write!(f, "Model artifact not found: {}", path.display())
            }
            ModelLoadError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            ModelLoadError::Corrupt { path, message } => {
                write!(f, "Corrupt model artifact {}: {}", path.display(), message)
            }
            ModelLoadError::VersionMismatch { expected, found } => write!(
                f,
                "Model version mismatch: expected {}, found {}",
                expected, found
            ),
            ModelLoadError::SchemaMismatch(msg) => write!(f, "Model schema mismatch: {}", msg),
            ModelLoadError::Preprocessing(err) => write!(f, "Preprocessing state error: {}", err),
        }
    }
}

impl std::error::Error for ModelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelLoadError::Preprocessing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PreprocessingError> for ModelLoadError {
    fn from(err: PreprocessingError) -> Self {
        ModelLoadError::Preprocessing(err)
    }
}

/// Failure of the preprocessing chain or the artifact call during prediction.
#[derive(Debug)]
pub enum PredictionError {
    Preprocessing(PreprocessingError),
    /// The artifact rejected its input.
    Artifact(String),
    /// The artifact produced NaN or infinity.
    NonFinite { value: f64 },
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionError::Preprocessing(err) => write!(f, "Preprocessing failed: {}", err),
            PredictionError::Artifact(msg) => write!(f, "Artifact call failed: {}", msg),
            PredictionError::NonFinite { value } => {
                write!(f, "Artifact returned non-finite value {}", value)
            }
        }
    }
}

impl std::error::Error for PredictionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictionError::Preprocessing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PreprocessingError> for PredictionError {
    fn from(err: PreprocessingError) -> Self {
        PredictionError::Preprocessing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_lists_available() {
        let err = ModelLoadError::UnknownModel {
            name: "v9".to_string(),
            available: vec!["v1".to_string(), "v2".to_string()],
        };
        assert_eq!(err.to_string(), "Unknown model 'v9' (available: v1, v2)");
    }

    #[test]
    fn test_version_mismatch_display() {
        let err = ModelLoadError::VersionMismatch {
            expected: "0.1.0".to_string(),
            found: "0.2.0".to_string(),
        };
        assert!(err.to_string().contains("expected 0.1.0, found 0.2.0"));
    }

    #[test]
    fn test_prediction_error_from_preprocessing() {
        let err: PredictionError = PreprocessingError::UnknownCategory {
            column: "children".to_string(),
            value: 7,
        }
        .into();
        assert!(matches!(err, PredictionError::Preprocessing(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
