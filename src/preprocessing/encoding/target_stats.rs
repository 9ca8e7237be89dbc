//! Target (mean) encoding of the discrete columns.
//!
//! At fit time each discrete column is grouped by value and the mean of
//! `charges` is recorded per group. At transform time the recorded mean is
//! attached as a `<column>_mean_charges` feature. A value without a recorded
//! mean is an error, never a default.

use crate::preprocessing::encoding::categorical::{CategoricalColumn, EncodedRecord};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

/// Looked-up means for one row, in [`CategoricalColumn::ALL`] order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetMeans([f64; CategoricalColumn::COUNT]);

impl TargetMeans {
    pub fn as_array(&self) -> &[f64; CategoricalColumn::COUNT] {
        &self.0
    }
}

impl Index<CategoricalColumn> for TargetMeans {
    type Output = f64;

    fn index(&self, column: CategoricalColumn) -> &f64 {
        &self.0[column.index()]
    }
}

/// Serializable parameters for a fitted TargetStatsEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetStatsParams {
    /// Mean target per (column, category value).
    pub means: BTreeMap<CategoricalColumn, BTreeMap<i64, f64>>,
}

/// TargetStatsEncoder (unfitted).
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetStatsEncoder;

impl TargetStatsEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for TargetStatsEncoder {
    type Input = [EncodedRecord];
    type Params = TargetStatsParams;
    type Fitted = FittedTargetStatsEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit TargetStatsEncoder on empty data".to_string(),
            ));
        }

        // (sum, count) per column and value
        let mut sums: BTreeMap<CategoricalColumn, BTreeMap<i64, (f64, usize)>> = BTreeMap::new();

        for (row, record) in data.iter().enumerate() {
            let charges = record
                .charges
                .ok_or(PreprocessingError::MissingTarget { row })?;
            if !charges.is_finite() {
                return Err(PreprocessingError::NonFinite {
                    column: "charges".to_string(),
                    row,
                });
            }

            for column in CategoricalColumn::ALL {
                let entry = sums
                    .entry(column)
                    .or_default()
                    .entry(record.category(column))
                    .or_insert((0.0, 0));
                entry.0 += charges;
                entry.1 += 1;
            }
        }

        let means = sums
            .into_iter()
            .map(|(column, groups)| {
                let column_means = groups
                    .into_iter()
                    .map(|(value, (sum, count))| (value, sum / count as f64))
                    .collect();
                (column, column_means)
            })
            .collect();

        Ok(FittedTargetStatsEncoder { means })
    }
}

/// Fitted TargetStatsEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedTargetStatsEncoder {
    means: BTreeMap<CategoricalColumn, BTreeMap<i64, f64>>,
}

impl FittedTargetStatsEncoder {
    /// Recorded mean for a category value, if it was seen at fit time.
    pub fn mean(&self, column: CategoricalColumn, value: i64) -> Option<f64> {
        self.means.get(&column)?.get(&value).copied()
    }

    /// Category values seen at fit time for a column, ascending.
    pub fn categories(&self, column: CategoricalColumn) -> Vec<i64> {
        self.means
            .get(&column)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }
}

impl FittedTransformer for FittedTargetStatsEncoder {
    type Input = EncodedRecord;
    type Output = TargetMeans;
    type Params = TargetStatsParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let mut out = [0.0; CategoricalColumn::COUNT];
        for column in CategoricalColumn::ALL {
            let value = data.category(column);
            out[column.index()] = self.mean(column, value).ok_or_else(|| {
                PreprocessingError::UnknownCategory {
                    column: column.name().to_string(),
                    value,
                }
            })?;
        }
        Ok(TargetMeans(out))
    }

    fn extract_params(&self) -> Self::Params {
        TargetStatsParams {
            means: self.means.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        for column in CategoricalColumn::ALL {
            match params.means.get(&column) {
                Some(groups) if !groups.is_empty() => {}
                _ => {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "No target statistics for column {}",
                        column.name()
                    )))
                }
            }
        }
        Ok(Self {
            means: params.means,
        })
    }
}
