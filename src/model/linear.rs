//! Linear regression artifact: `y = w^T x + b` over the encoded features.
//!
//! The artifact predicts in scaled target units; the caller maps the result
//! back with the preprocessor's target bounds.
//!
//! On disk it is a bincode file named `trained_model-<version>.bin` holding
//! [`LinearArtifactParams`]. The file embeds its version and the ordered
//! feature names it was trained on, and both are checked at load.

use crate::model::error::{ModelLoadError, PredictionError};
use crate::model::RegressionArtifact;
use crate::preprocessing::features::{Feature, FeatureVector, N_FEATURES};
use crate::serialization::SerializableParams;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Serializable representation of a linear artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearArtifactParams {
    pub version: String,
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// A fitted linear model over the 18 encoded features.
#[derive(Clone, Debug)]
pub struct LinearArtifact {
    version: String,
    weights: Array1<f64>,
    bias: f64,
}

impl LinearArtifact {
    /// Creates an artifact from trained weights (one per [`Feature`]) and bias.
    pub fn new(version: impl Into<String>, weights: FeatureVector, bias: f64) -> Self {
        Self {
            version: version.into(),
            weights: weights.to_array(),
            bias,
        }
    }

    /// `<dir>/trained_model-<version>.bin`
    pub fn artifact_path<P: AsRef<Path>>(dir: P, version: &str) -> PathBuf {
        dir.as_ref().join(format!("trained_model-{}.bin", version))
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn extract_params(&self) -> LinearArtifactParams {
        LinearArtifactParams {
            version: self.version.clone(),
            feature_names: Feature::names().into_iter().map(String::from).collect(),
            weights: self.weights.to_vec(),
            bias: self.bias,
        }
    }

    /// Save to an explicit path.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let bytes = self.extract_params().to_bytes().map_err(io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Save under `dir` with the conventional file name and return the path.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir.as_ref())?;
        let path = Self::artifact_path(dir, &self.version);
        self.save_to_file(&path)?;
        Ok(path)
    }

    /// Load and check an artifact file against the expected version and the
    /// crate's feature layout.
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        expected_version: &str,
    ) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ModelLoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ModelLoadError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let params =
            LinearArtifactParams::from_bytes(&bytes).map_err(|e| ModelLoadError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if params.version != expected_version {
            return Err(ModelLoadError::VersionMismatch {
                expected: expected_version.to_string(),
                found: params.version,
            });
        }

        Self::from_params(params)
    }

    /// Reconstruct from parameters, checking the feature layout.
    pub fn from_params(params: LinearArtifactParams) -> Result<Self, ModelLoadError> {
        let expected = Feature::names();
        if params.feature_names != expected {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "feature names {:?} do not match {:?}",
                params.feature_names, expected
            )));
        }
        if params.weights.len() != N_FEATURES {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "expected {} weights, got {}",
                N_FEATURES,
                params.weights.len()
            )));
        }

        Ok(Self {
            version: params.version,
            weights: Array1::from(params.weights),
            bias: params.bias,
        })
    }
}

impl RegressionArtifact for LinearArtifact {
    fn version(&self) -> &str {
        &self.version
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        let x = ArrayView1::from(features.as_slice());
        Ok(self.weights.dot(&x) + self.bias)
    }
}
