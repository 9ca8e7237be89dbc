//! Regression artifacts and the static registry that loads them.
//!
//! An artifact is an opaque trained predictor over a [`FeatureVector`] in
//! scaled units. The registry maps a model name from configuration to a loader
//! function, so no model is ever resolved by dynamic import.

pub mod error;
pub mod linear;
pub mod registry;

pub use error::{ModelLoadError, PredictionError};
pub use linear::{LinearArtifact, LinearArtifactParams};
pub use registry::{ModelRegistry, ModelSpec};

use crate::preprocessing::features::FeatureVector;

/// A trained regressor usable by the prediction service.
pub trait RegressionArtifact: Send + Sync {
    /// Version string embedded in the artifact, returned verbatim to callers.
    fn version(&self) -> &str;

    /// Predict on a single scaled feature row.
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError>;

    /// Predict on many rows.
    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, PredictionError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
