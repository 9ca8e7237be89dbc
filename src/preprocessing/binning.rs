//! Equal-width binning of continuous features into ordinal codes.
//!
//! Fit splits the training range `[min, max]` into `n_bins` intervals of equal
//! width. Only intervals holding at least one training value get a code, and
//! those are numbered 0, 1, 2, ... by ascending lower bound. A value landing
//! in an interval that stayed empty at fit is rejected like one outside the
//! range.
//!
//! Membership is right-closed: a value belongs to the first bin whose upper
//! edge is `>=` the value. The leftmost bin is closed at the fitted minimum
//! and the last upper edge is exactly the fitted maximum. Values outside
//! `[min, max]` are rejected.
//!
//! ```text
//! edges:  e0      e1      e2   ...   e(n-1)     en
//! bins:   [ 0  ] ( 1  ]  ( 2  ] ... ( n-1       ]
//! ```
//!
//! # Example
//! ```ignore
//! let fitted = BinEncoder::new("age").fit(&[18.0, 40.0, 64.0])?;
//! assert_eq!(fitted.transform(&18.0)?, 0);
//! assert_eq!(fitted.transform(&40.0)?, 1);
//! assert_eq!(fitted.transform(&64.0)?, 2);
//! assert!(fitted.transform(&30.0).is_err());
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};

/// Number of bins used for `age` and `bmi`.
pub const DEFAULT_BINS: usize = 7;

/// One fitted interval and its ordinal code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinInterval {
    pub lower: f64,
    pub upper: f64,
    /// `None` when no training value fell in the interval.
    pub code: Option<usize>,
}

/// Serializable parameters for a fitted BinEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinEncoderParams {
    /// Name of the binned feature, used in error reports.
    pub feature: String,
    /// `n_bins + 1` ascending boundaries.
    pub edges: Vec<f64>,
    /// All `n_bins` intervals, ascending by lower bound.
    pub bins: Vec<BinInterval>,
}

/// BinEncoder transformer (unfitted).
#[derive(Clone, Debug)]
pub struct BinEncoder {
    feature: String,
    n_bins: usize,
}

impl BinEncoder {
    /// Create a new BinEncoder with [`DEFAULT_BINS`] bins.
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            n_bins: DEFAULT_BINS,
        }
    }

    /// Set the number of bins. Zero is rejected by `fit`.
    pub fn with_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins;
        self
    }
}

impl Transformer for BinEncoder {
    type Input = [f64];
    type Params = BinEncoderParams;
    type Fitted = FittedBinEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.n_bins == 0 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "BinEncoder for {} needs at least one bin",
                self.feature
            )));
        }
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(format!(
                "Cannot fit BinEncoder for {} on empty data",
                self.feature
            )));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (row, &value) in data.iter().enumerate() {
            if !value.is_finite() {
                return Err(PreprocessingError::NonFinite {
                    column: self.feature.clone(),
                    row,
                });
            }
            min = min.min(value);
            max = max.max(value);
        }

        // A constant column is widened by 0.1% on each side so it still yields
        // n_bins intervals.
        if min == max {
            let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
            min -= pad;
            max += pad;
        }

        let width = (max - min) / self.n_bins as f64;
        let mut edges: Vec<f64> = (0..self.n_bins)
            .map(|i| min + width * i as f64)
            .collect();
        edges.push(max);

        let mut observed = vec![false; self.n_bins];
        for &value in data {
            observed[locate(&edges, value)] = true;
        }

        let mut next_code = 0;
        let bins = edges
            .windows(2)
            .zip(observed)
            .map(|(pair, seen)| {
                let code = seen.then(|| {
                    next_code += 1;
                    next_code - 1
                });
                BinInterval {
                    lower: pair[0],
                    upper: pair[1],
                    code,
                }
            })
            .collect();

        Ok(FittedBinEncoder {
            feature: self.feature.clone(),
            edges,
            bins,
        })
    }
}

/// Fitted BinEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedBinEncoder {
    feature: String,
    edges: Vec<f64>,
    bins: Vec<BinInterval>,
}

impl FittedBinEncoder {
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Bin boundaries, `n_bins + 1` ascending values.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Fitted intervals with their ordinal codes.
    pub fn bins(&self) -> &[BinInterval] {
        &self.bins
    }

    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    /// Number of intervals that received a code at fit.
    pub fn n_codes(&self) -> usize {
        self.bins.iter().filter(|bin| bin.code.is_some()).count()
    }

    /// Range of values accepted by `transform`.
    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }
}

impl FittedTransformer for FittedBinEncoder {
    type Input = f64;
    type Output = usize;
    type Params = BinEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let value = *data;
        let (lower, upper) = self.range();

        if !(value >= lower && value <= upper) {
            return Err(PreprocessingError::UnseenBin {
                feature: self.feature.clone(),
                value,
                lower,
                upper,
            });
        }

        let bin = &self.bins[locate(&self.edges, value)];
        bin.code.ok_or_else(|| PreprocessingError::UnseenBin {
            feature: self.feature.clone(),
            value,
            lower: bin.lower,
            upper: bin.upper,
        })
    }

    fn extract_params(&self) -> Self::Params {
        BinEncoderParams {
            feature: self.feature.clone(),
            edges: self.edges.clone(),
            bins: self.bins.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.bins.is_empty() || params.edges.len() != params.bins.len() + 1 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "BinEncoder for {} needs n_bins + 1 edges, got {} edges for {} bins",
                params.feature,
                params.edges.len(),
                params.bins.len()
            )));
        }
        if params.edges.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "BinEncoder edges for {} are not strictly ascending",
                params.feature
            )));
        }
        let codes: Vec<usize> = params.bins.iter().filter_map(|bin| bin.code).collect();
        if codes.is_empty() || codes.iter().enumerate().any(|(i, &code)| code != i) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "BinEncoder codes for {} must number the observed bins 0, 1, 2, ...",
                params.feature
            )));
        }

        Ok(Self {
            feature: params.feature,
            edges: params.edges,
            bins: params.bins,
        })
    }
}

/// Index of the right-closed interval holding `value`, which must lie within
/// `[edges[0], edges[n]]`.
fn locate(edges: &[f64], value: f64) -> usize {
    let uppers = &edges[1..];
    uppers
        .partition_point(|&upper| upper < value)
        .min(uppers.len() - 1)
}
