//! Min-Max Scaler.
//!
//! Transforms each column to `[0, 1]` using the minimum and maximum seen at
//! fit time:
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min)
//! X        = X_scaled * (X_max - X_min) + X_min
//! ```
//!
//! A constant column (`X_max == X_min`) scales to exactly `0`, and its inverse
//! always returns `X_min`.
//!
//! # Example
//! ```ignore
//! let fitted = MinMaxScaler::new().fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! let recovered = fitted.inverse_transform(&scaled)?;
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Minimum of each column.
    pub data_min: Vec<f64>,
    /// Maximum of each column.
    pub data_max: Vec<f64>,
}

/// MinMaxScaler transformer (unfitted).
#[derive(Clone, Copy, Debug, Default)]
pub struct MinMaxScaler;

impl MinMaxScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for MinMaxScaler {
    type Input = Array2<f64>;
    type Params = MinMaxScalerParams;
    type Fitted = FittedMinMaxScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.dim();

        if rows == 0 || cols == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit MinMaxScaler on empty data".to_string(),
            ));
        }

        if let Some(((row, col), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PreprocessingError::NonFinite {
                column: format!("column {}", col),
                row,
            });
        }

        let data_min = data.fold_axis(Axis(0), f64::INFINITY, |acc, &x| acc.min(x));
        let data_max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &x| acc.max(x));

        Ok(FittedMinMaxScaler { data_min, data_max })
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler {
    data_min: Array1<f64>,
    data_max: Array1<f64>,
}

impl FittedMinMaxScaler {
    /// Get the minimum values for each column.
    pub fn data_min(&self) -> &Array1<f64> {
        &self.data_min
    }

    /// Get the maximum values for each column.
    pub fn data_max(&self) -> &Array1<f64> {
        &self.data_max
    }

    /// Get the data range (max - min) for each column.
    pub fn data_range(&self) -> Array1<f64> {
        &self.data_max - &self.data_min
    }

    pub fn n_features_in(&self) -> usize {
        self.data_min.len()
    }

    /// Fitted (min, max) of one column.
    pub fn bounds(&self, col: usize) -> (f64, f64) {
        (self.data_min[col], self.data_max[col])
    }

    /// Scale a single value of column `col`.
    pub fn scale_value(&self, col: usize, x: f64) -> f64 {
        let (min, max) = self.bounds(col);
        let range = max - min;
        if range == 0.0 {
            0.0
        } else {
            (x - min) / range
        }
    }

    /// Map a scaled value of column `col` back to the original units.
    pub fn inverse_value(&self, col: usize, x: f64) -> f64 {
        let (min, max) = self.bounds(col);
        x * (max - min) + min
    }

    /// Map scaled rows back to the original units.
    pub fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        self.check_features(data.ncols())?;
        let mut out = data.clone();
        for (col, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|x| self.inverse_value(col, x));
        }
        Ok(out)
    }

    fn check_features(&self, got: usize) -> Result<(), PreprocessingError> {
        if got != self.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in(),
                got_features: got,
            });
        }
        Ok(())
    }
}

impl FittedTransformer for FittedMinMaxScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = MinMaxScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_features(data.ncols())?;
        let mut out = data.clone();
        for (col, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|x| self.scale_value(col, x));
        }
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            data_min: self.data_min.to_vec(),
            data_max: self.data_max.to_vec(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.data_min.len() != params.data_max.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.data_min.len(),
                got_features: params.data_max.len(),
            });
        }
        if params
            .data_min
            .iter()
            .zip(&params.data_max)
            .any(|(min, max)| !(min <= max))
        {
            return Err(PreprocessingError::InvalidParameter(
                "MinMaxScaler min exceeds max".to_string(),
            ));
        }

        Ok(Self {
            data_min: Array1::from(params.data_min),
            data_max: Array1::from(params.data_max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[0.0, 1.0, 5.0], [0.5, 1.0, 5.0], [1.0, 3.0, 5.0]]
    }

    #[test]
    fn test_minmax_scaler_fit() {
        let fitted = MinMaxScaler::new().fit(&create_test_data()).unwrap();

        assert_eq!(fitted.data_min(), &array![0.0, 1.0, 5.0]);
        assert_eq!(fitted.data_max(), &array![1.0, 3.0, 5.0]);
        assert_eq!(fitted.data_range(), array![1.0, 2.0, 0.0]);
        assert_eq!(fitted.n_features_in(), 3);
    }

    #[test]
    fn test_minmax_scaler_transform() {
        let data = create_test_data();
        let fitted = MinMaxScaler::new().fit(&data).unwrap();
        let scaled = fitted.transform(&data).unwrap();

        assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.5, 1.0]);
        assert_eq!(scaled.column(1).to_vec(), vec![0.0, 0.0, 1.0]);
        // Constant column scales to zero
        assert_eq!(scaled.column(2).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_minmax_scaler_boundaries_exact() {
        let data = array![[1121.87], [63770.43], [8240.59]];
        let fitted = MinMaxScaler::new().fit(&data).unwrap();
        assert_eq!(fitted.scale_value(0, 63770.43), 1.0);
        assert_eq!(fitted.scale_value(0, 1121.87), 0.0);
    }

    #[test]
    fn test_minmax_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = MinMaxScaler::new().fit(&data).unwrap();

        let scaled = fitted.transform(&data).unwrap();
        let recovered = fitted.inverse_transform(&scaled).unwrap();

        for (o, r) in data.iter().zip(recovered.iter()) {
            assert!((o - r).abs() < 1e-9, "Expected {}, got {}", o, r);
        }
    }

    #[test]
    fn test_degenerate_inverse_returns_min() {
        let fitted = MinMaxScaler::new().fit(&array![[7.0], [7.0]]).unwrap();
        assert_eq!(fitted.scale_value(0, 7.0), 0.0);
        assert_eq!(fitted.inverse_value(0, 0.0), 7.0);
        assert_eq!(fitted.inverse_value(0, 0.75), 7.0);
    }

    #[test]
    fn test_minmax_scaler_serialization() {
        let data = create_test_data();
        let fitted = MinMaxScaler::new().fit(&data).unwrap();
        let restored = FittedMinMaxScaler::from_params(fitted.extract_params()).unwrap();

        assert_eq!(
            fitted.transform(&data).unwrap(),
            restored.transform(&data).unwrap()
        );
    }

    #[test]
    fn test_minmax_scaler_feature_mismatch() {
        let fitted = MinMaxScaler::new().fit(&create_test_data()).unwrap();
        let wrong_data = array![[1.0, 2.0]];

        assert!(matches!(
            fitted.transform(&wrong_data),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 3,
                got_features: 2
            })
        ));
    }

    #[test]
    fn test_minmax_scaler_empty_data() {
        let data = Array2::<f64>::zeros((0, 2));
        let result = MinMaxScaler::new().fit(&data);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_minmax_scaler_non_finite() {
        let data = array![[1.0, 2.0], [f64::NAN, 3.0]];
        let result = MinMaxScaler::new().fit(&data);
        assert!(matches!(
            result,
            Err(PreprocessingError::NonFinite { row: 1, .. })
        ));
    }

    #[test]
    fn test_from_params_rejects_inverted_bounds() {
        let params = MinMaxScalerParams {
            data_min: vec![2.0],
            data_max: vec![1.0],
        };
        assert!(FittedMinMaxScaler::from_params(params).is_err());
    }
}
