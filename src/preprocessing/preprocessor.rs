//! Fit / transform orchestration of the full preprocessing chain.
//!
//! Fit runs, in this order:
//! ```text
//! bounds -> CategoricalEncoder -> TargetStatsEncoder.fit
//!        -> BinEncoder.fit(age), BinEncoder.fit(bmi) -> FeatureScaler.fit
//! ```
//! Transform replays the same chain with the fitted components and never
//! refits anything. The resulting [`FittedPreprocessor`] is immutable and can
//! be persisted as a [`FittedPreprocessorState`].

use crate::dataset::Record;
use crate::preprocessing::binning::{BinEncoder, BinEncoderParams, FittedBinEncoder, DEFAULT_BINS};
use crate::preprocessing::encoding::{
    CategoricalEncoder, FittedTargetStatsEncoder, TargetStatsEncoder, TargetStatsParams,
};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::features::{assemble, EncodedFrame, FeatureVector};
use crate::preprocessing::scaling::{FeatureScaler, FeatureScalerParams, FittedFeatureScaler};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::validation::{InputBounds, SchemaValidator};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Options controlling the output of [`FittedPreprocessor::transform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformOptions {
    /// Leave `charges` out of the output.
    pub drop_target: bool,
    /// Apply the fitted feature (and target) scaling.
    pub scale: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            drop_target: true,
            scale: false,
        }
    }
}

impl TransformOptions {
    /// Options used for a prediction request.
    pub fn inference() -> Self {
        Self {
            drop_target: true,
            scale: true,
        }
    }

    /// Scaled features with the scaled target kept beside them.
    pub fn training() -> Self {
        Self {
            drop_target: false,
            scale: true,
        }
    }
}

/// Serializable fitted state of the whole chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessorState {
    pub bounds: InputBounds,
    pub target_stats: TargetStatsParams,
    pub age_bins: BinEncoderParams,
    pub bmi_bins: BinEncoderParams,
    pub scaler: FeatureScalerParams,
}

/// Preprocessor (unfitted).
#[derive(Clone, Debug)]
pub struct Preprocessor {
    n_bins: usize,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            n_bins: DEFAULT_BINS,
        }
    }

    /// Set the number of bins used for `age` and `bmi`. Zero is rejected by
    /// `fit`.
    pub fn with_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins;
        self
    }

    /// Fit every stage on the training records.
    pub fn fit(&self, records: &[Record]) -> Result<FittedPreprocessor, PreprocessingError> {
        self.fit_frame(records).map(|(fitted, _)| fitted)
    }

    /// Fit, then return the training rows unscaled and without target.
    pub fn fit_transform(
        &self,
        records: &[Record],
    ) -> Result<(FittedPreprocessor, EncodedFrame), PreprocessingError> {
        let (fitted, mut frame) = self.fit_frame(records)?;
        frame.target = None;
        Ok((fitted, frame))
    }

    /// Fit and keep the unscaled training frame (with target) that the scaler
    /// was fitted on.
    fn fit_frame(
        &self,
        records: &[Record],
    ) -> Result<(FittedPreprocessor, EncodedFrame), PreprocessingError> {
        if self.n_bins == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "Preprocessor needs at least one bin".to_string(),
            ));
        }
        if records.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit Preprocessor on empty data".to_string(),
            ));
        }
        for (row, record) in records.iter().enumerate() {
            match record.charges {
                Some(charges) if charges.is_finite() => {}
                _ => return Err(PreprocessingError::MissingTarget { row }),
            }
        }

        let bounds = InputBounds::from_records(records)?;

        let encoded = CategoricalEncoder::new().encode_all(records);
        let target_stats = TargetStatsEncoder::new().fit(&encoded)?;

        let ages: Vec<f64> = records.iter().map(|r| r.age as f64).collect();
        let bmis: Vec<f64> = records.iter().map(|r| r.bmi).collect();
        let age_bins = BinEncoder::new("age").with_bins(self.n_bins).fit(&ages)?;
        let bmi_bins = BinEncoder::new("bmi").with_bins(self.n_bins).fit(&bmis)?;

        let rows = encoded
            .iter()
            .map(|record| assemble(record, &target_stats, &age_bins, &bmi_bins))
            .collect::<Result<Vec<_>, _>>()?;
        let target = records.iter().filter_map(|r| r.charges).collect();
        let frame = EncodedFrame {
            rows,
            target: Some(target),
        };

        let scaler = FeatureScaler::new().fit(&frame)?;

        let fitted = FittedPreprocessor {
            bounds,
            target_stats,
            age_bins,
            bmi_bins,
            scaler,
        };
        Ok((fitted, frame))
    }
}

/// Fitted preprocessing chain ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPreprocessor {
    bounds: InputBounds,
    target_stats: FittedTargetStatsEncoder,
    age_bins: FittedBinEncoder,
    bmi_bins: FittedBinEncoder,
    scaler: FittedFeatureScaler,
}

impl FittedPreprocessor {
    /// Numeric bounds captured from the training set.
    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    /// Validator enforcing the fitted bounds.
    pub fn validator(&self) -> SchemaValidator {
        SchemaValidator::new(self.bounds)
    }

    pub fn target_stats(&self) -> &FittedTargetStatsEncoder {
        &self.target_stats
    }

    pub fn age_bins(&self) -> &FittedBinEncoder {
        &self.age_bins
    }

    pub fn bmi_bins(&self) -> &FittedBinEncoder {
        &self.bmi_bins
    }

    pub fn scaler(&self) -> &FittedFeatureScaler {
        &self.scaler
    }

    /// Encode a record into its unscaled feature row.
    ///
    /// The numeric fields are checked against the fitted bounds before any
    /// bin lookup.
    pub fn encode(&self, record: &Record) -> Result<FeatureVector, PreprocessingError> {
        self.validator().check(record)?;
        let encoded = CategoricalEncoder::new().encode(record);
        assemble(&encoded, &self.target_stats, &self.age_bins, &self.bmi_bins)
    }

    /// Transform records with the fitted state.
    ///
    /// # Errors
    /// - `MissingTarget` when the target is kept and a row has no finite `charges`
    /// - `Validation` when a numeric field is outside the fitted bounds
    /// - `UnknownCategory` / `UnseenBin` when a row is not covered by the fitted state
    pub fn transform(
        &self,
        records: &[Record],
        options: TransformOptions,
    ) -> Result<EncodedFrame, PreprocessingError> {
        let mut rows = Vec::with_capacity(records.len());
        let mut target = Vec::with_capacity(if options.drop_target { 0 } else { records.len() });

        for (row, record) in records.iter().enumerate() {
            if !options.drop_target {
                let charges = record
                    .charges
                    .filter(|c| c.is_finite())
                    .ok_or(PreprocessingError::MissingTarget { row })?;
                target.push(if options.scale {
                    self.scaler.scale_target(charges)
                } else {
                    charges
                });
            }

            let features = self.encode(record)?;
            rows.push(if options.scale {
                self.scaler.transform(&features)?
            } else {
                features
            });
        }

        Ok(EncodedFrame {
            rows,
            target: (!options.drop_target).then_some(target),
        })
    }

    /// Encode and scale a single record for prediction.
    pub fn transform_one(&self, record: &Record) -> Result<FeatureVector, PreprocessingError> {
        let features = self.encode(record)?;
        self.scaler.transform(&features)
    }

    /// Scale a target value with the fitted target bounds.
    pub fn scale_target(&self, value: f64) -> f64 {
        self.scaler.scale_target(value)
    }

    /// Map a scaled target value back to charges.
    pub fn inverse_transform_target(&self, value: f64) -> f64 {
        self.scaler.inverse_transform_target(value)
    }

    /// Map a scaled feature row back to encoded units.
    pub fn inverse_transform_features(&self, row: &FeatureVector) -> FeatureVector {
        self.scaler.inverse_transform_features(row)
    }

    /// Fitted (min, max) of the target.
    pub fn target_bounds(&self) -> (f64, f64) {
        self.scaler.target_bounds()
    }

    /// Extract the serializable state.
    pub fn state(&self) -> FittedPreprocessorState {
        FittedPreprocessorState {
            bounds: self.bounds,
            target_stats: self.target_stats.extract_params(),
            age_bins: self.age_bins.extract_params(),
            bmi_bins: self.bmi_bins.extract_params(),
            scaler: self.scaler.extract_params(),
        }
    }

    /// Reconstruct from a serializable state.
    pub fn from_state(state: FittedPreprocessorState) -> Result<Self, PreprocessingError> {
        Ok(Self {
            bounds: state.bounds,
            target_stats: FittedTargetStatsEncoder::from_params(state.target_stats)?,
            age_bins: FittedBinEncoder::from_params(state.age_bins)?,
            bmi_bins: FittedBinEncoder::from_params(state.bmi_bins)?,
            scaler: FittedFeatureScaler::from_params(state.scaler)?,
        })
    }

    /// Save the fitted state to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let bytes = self.state().to_bytes().map_err(io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Load a fitted state from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        let state = FittedPreprocessorState::from_bytes(&bytes)?;
        Self::from_state(state)
    }
}
