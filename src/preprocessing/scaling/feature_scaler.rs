//! Range normalisation of the encoded feature matrix and of the target.
//!
//! Features and target are fitted independently, each with its own
//! [`MinMaxScaler`], so a prediction made in scaled target units can be mapped
//! back to charges.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::features::{EncodedFrame, Feature, FeatureVector, N_FEATURES};
use crate::preprocessing::scaling::minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted FeatureScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureScalerParams {
    pub features: MinMaxScalerParams,
    pub target: MinMaxScalerParams,
}

/// FeatureScaler (unfitted). Fits on an encoded frame that still carries its
/// target.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureScaler;

impl FeatureScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for FeatureScaler {
    type Input = EncodedFrame;
    type Params = FeatureScalerParams;
    type Fitted = FittedFeatureScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let target = data
            .target
            .as_ref()
            .ok_or(PreprocessingError::MissingTarget { row: 0 })?;
        if target.len() != data.n_rows() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "Target has {} values for {} rows",
                target.len(),
                data.n_rows()
            )));
        }

        let features = MinMaxScaler::new().fit(&data.to_matrix())?;
        let target_column = Array1::from(target.clone()).insert_axis(Axis(1));
        let target = MinMaxScaler::new().fit(&target_column).map_err(|e| match e {
            PreprocessingError::NonFinite { row, .. } => PreprocessingError::NonFinite {
                column: "charges".to_string(),
                row,
            },
            other => other,
        })?;

        Ok(FittedFeatureScaler { features, target })
    }
}

/// Fitted FeatureScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedFeatureScaler {
    features: FittedMinMaxScaler,
    target: FittedMinMaxScaler,
}

impl FittedFeatureScaler {
    /// Scale a target value with the fitted target bounds.
    pub fn scale_target(&self, value: f64) -> f64 {
        self.target.scale_value(0, value)
    }

    /// `x * (max - min) + min` with the fitted target bounds.
    pub fn inverse_transform_target(&self, value: f64) -> f64 {
        self.target.inverse_value(0, value)
    }

    /// Map a scaled feature row back to encoded units.
    pub fn inverse_transform_features(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = *row;
        for feature in Feature::ALL {
            out[feature] = self.features.inverse_value(feature.index(), row[feature]);
        }
        out
    }

    /// Scale many feature rows at once.
    pub fn scale_matrix(&self, matrix: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        self.features.transform(matrix)
    }

    /// Fitted (min, max) of one feature column.
    pub fn feature_bounds(&self, feature: Feature) -> (f64, f64) {
        self.features.bounds(feature.index())
    }

    /// Fitted (min, max) of the target.
    pub fn target_bounds(&self) -> (f64, f64) {
        self.target.bounds(0)
    }
}

impl FittedTransformer for FittedFeatureScaler {
    type Input = FeatureVector;
    type Output = FeatureVector;
    type Params = FeatureScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let mut out = *data;
        for feature in Feature::ALL {
            out[feature] = self.features.scale_value(feature.index(), data[feature]);
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        FeatureScalerParams {
            features: self.features.extract_params(),
            target: self.target.extract_params(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let features = FittedMinMaxScaler::from_params(params.features)?;
        let target = FittedMinMaxScaler::from_params(params.target)?;

        if features.n_features_in() != N_FEATURES {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: N_FEATURES,
                got_features: features.n_features_in(),
            });
        }
        if target.n_features_in() != 1 {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: 1,
                got_features: target.n_features_in(),
            });
        }

        Ok(Self { features, target })
    }
}
