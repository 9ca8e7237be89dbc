//! Error types for validation and preprocessing operations.

use crate::dataset::Field;
use std::fmt;

/// Why a field failed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    /// Numeric value outside the bounds captured at fit time.
    OutOfRange { value: f64, min: f64, max: f64 },
    /// Categorical value outside its fixed enumeration.
    InvalidEnum {
        value: String,
        expected: &'static [&'static str],
    },
    /// Required value absent.
    Missing,
}

/// A single field rejected by the schema validator.
///
/// This is the caller's fault and maps to a client error at the service edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn out_of_range(field: Field, value: f64, (min, max): (f64, f64)) -> Self {
        Self {
            field,
            kind: ValidationErrorKind::OutOfRange { value, min, max },
        }
    }

    pub fn invalid_enum(field: Field, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            field,
            kind: ValidationErrorKind::InvalidEnum {
                value: value.to_string(),
                expected,
            },
        }
    }

    pub fn missing(field: Field) -> Self {
        Self {
            field,
            kind: ValidationErrorKind::Missing,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::OutOfRange { value, min, max } => write!(
                f,
                "Field '{}' out of range: {} not in [{}, {}]",
                self.field, value, min, max
            ),
            ValidationErrorKind::InvalidEnum { value, expected } => write!(
                f,
                "Field '{}' has invalid value '{}' (expected one of {})",
                self.field,
                value,
                expected.join(", ")
            ),
            ValidationErrorKind::Missing => write!(f, "Field '{}' is missing", self.field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Error type for preprocessing operations.
#[derive(Debug)]
pub enum PreprocessingError {
    /// Input rejected by the schema validator.
    Validation(ValidationError),
    /// Continuous value outside every bin fitted for the feature.
    UnseenBin {
        feature: String,
        value: f64,
        lower: f64,
        upper: f64,
    },
    /// Category value with no target statistic recorded at fit time.
    UnknownCategory { column: String, value: i64 },
    /// Row without a target value where one is required.
    MissingTarget { row: usize },
    /// NaN or infinite value where a finite one is required.
    NonFinite { column: String, row: usize },
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Invalid hyperparameter or inconsistent fitted parameters.
    InvalidParameter(String),
    /// Feature dimension mismatch.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
}

impl PreprocessingError {
    /// True for errors signalling inference data not covered by the fitted state.
    pub fn is_drift(&self) -> bool {
        matches!(
            self,
            PreprocessingError::UnseenBin { .. } | PreprocessingError::UnknownCategory { .. }
        )
    }
}

impl fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessingError::Validation(err) => write!(f, "Validation error: {}", err),
            PreprocessingError::UnseenBin {
                feature,
                value,
                lower,
                upper,
            } => write!(
                f,
                "Unseen bin: {} = {} outside fitted range [{}, {}]",
                feature, value, lower, upper
            ),
            PreprocessingError::UnknownCategory { column, value } => {
                write!(f, "Unknown category: {} = {} was not seen at fit", column, value)
            }
            PreprocessingError::MissingTarget { row } => {
                write!(f, "Missing target: row {} has no charges", row)
            }
            PreprocessingError::NonFinite { column, row } => {
                write!(f, "Non-finite value in {} at row {}", column, row)
            }
            PreprocessingError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            PreprocessingError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PreprocessingError::FeatureMismatch {
                expected_features,
                got_features,
            } => write!(
                f,
                "Feature mismatch: expected {} features, got {}",
                expected_features, got_features
            ),
            PreprocessingError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PreprocessingError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PreprocessingError {}

impl From<ValidationError> for PreprocessingError {
    fn from(err: ValidationError) -> Self {
        PreprocessingError::Validation(err)
    }
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}
