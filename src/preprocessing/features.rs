//! The encoded feature layout.
//!
//! Every row that leaves the preprocessor is a [`FeatureVector`]: a fixed-size
//! array indexed by the closed [`Feature`] enumeration. Fit and transform both
//! build rows through [`assemble`], so the column order cannot drift between
//! them.

use crate::preprocessing::binning::FittedBinEncoder;
use crate::preprocessing::encoding::{CategoricalColumn, EncodedRecord, FittedTargetStatsEncoder};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of encoded feature columns.
pub const N_FEATURES: usize = 18;

/// Encoded feature columns in matrix order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Age,
    Sex,
    Bmi,
    Children,
    Smoker,
    Southwest,
    Southeast,
    Northwest,
    Northeast,
    SexMeanCharges,
    ChildrenMeanCharges,
    SmokerMeanCharges,
    NortheastMeanCharges,
    NorthwestMeanCharges,
    SoutheastMeanCharges,
    SouthwestMeanCharges,
    AgeBinEncoded,
    BmiBinEncoded,
}

impl Feature {
    pub const ALL: [Feature; N_FEATURES] = [
        Feature::Age,
        Feature::Sex,
        Feature::Bmi,
        Feature::Children,
        Feature::Smoker,
        Feature::Southwest,
        Feature::Southeast,
        Feature::Northwest,
        Feature::Northeast,
        Feature::SexMeanCharges,
        Feature::ChildrenMeanCharges,
        Feature::SmokerMeanCharges,
        Feature::NortheastMeanCharges,
        Feature::NorthwestMeanCharges,
        Feature::SoutheastMeanCharges,
        Feature::SouthwestMeanCharges,
        Feature::AgeBinEncoded,
        Feature::BmiBinEncoded,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Sex => "sex",
            Feature::Bmi => "bmi",
            Feature::Children => "children",
            Feature::Smoker => "smoker",
            Feature::Southwest => "southwest",
            Feature::Southeast => "southeast",
            Feature::Northwest => "northwest",
            Feature::Northeast => "northeast",
            Feature::SexMeanCharges => "sex_mean_charges",
            Feature::ChildrenMeanCharges => "children_mean_charges",
            Feature::SmokerMeanCharges => "smoker_mean_charges",
            Feature::NortheastMeanCharges => "northeast_mean_charges",
            Feature::NorthwestMeanCharges => "northwest_mean_charges",
            Feature::SoutheastMeanCharges => "southeast_mean_charges",
            Feature::SouthwestMeanCharges => "southwest_mean_charges",
            Feature::AgeBinEncoded => "age_bin_encoded",
            Feature::BmiBinEncoded => "bmi_bin_encoded",
        }
    }

    /// Column position in the feature matrix.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column names in matrix order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.name()).collect()
    }

    /// The `<column>_mean_charges` feature for a discrete column.
    pub const fn mean_charges_for(column: CategoricalColumn) -> Feature {
        match column {
            CategoricalColumn::Sex => Feature::SexMeanCharges,
            CategoricalColumn::Children => Feature::ChildrenMeanCharges,
            CategoricalColumn::Smoker => Feature::SmokerMeanCharges,
            CategoricalColumn::Northeast => Feature::NortheastMeanCharges,
            CategoricalColumn::Northwest => Feature::NorthwestMeanCharges,
            CategoricalColumn::Southeast => Feature::SoutheastMeanCharges,
            CategoricalColumn::Southwest => Feature::SouthwestMeanCharges,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One encoded row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn zeros() -> Self {
        Self([0.0; N_FEATURES])
    }

    pub fn from_array(values: [f64; N_FEATURES]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.0.to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

impl IndexMut<Feature> for FeatureVector {
    fn index_mut(&mut self, feature: Feature) -> &mut f64 {
        &mut self.0[feature.index()]
    }
}

/// Build the feature row for one categorically encoded record.
pub fn assemble(
    record: &EncodedRecord,
    target_stats: &FittedTargetStatsEncoder,
    age_bins: &FittedBinEncoder,
    bmi_bins: &FittedBinEncoder,
) -> Result<FeatureVector, PreprocessingError> {
    let means = target_stats.transform(record)?;
    let age_bin = age_bins.transform(&(record.age as f64))?;
    let bmi_bin = bmi_bins.transform(&record.bmi)?;

    let mut row = FeatureVector::zeros();
    row[Feature::Age] = record.age as f64;
    row[Feature::Sex] = record.sex as f64;
    row[Feature::Bmi] = record.bmi;
    row[Feature::Children] = record.children as f64;
    row[Feature::Smoker] = record.smoker as f64;
    row[Feature::Southwest] = record.southwest as f64;
    row[Feature::Southeast] = record.southeast as f64;
    row[Feature::Northwest] = record.northwest as f64;
    row[Feature::Northeast] = record.northeast as f64;
    for column in CategoricalColumn::ALL {
        row[Feature::mean_charges_for(column)] = means[column];
    }
    row[Feature::AgeBinEncoded] = age_bin as f64;
    row[Feature::BmiBinEncoded] = bmi_bin as f64;

    Ok(row)
}

/// Output of the preprocessor: feature rows plus the optional target column.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedFrame {
    pub rows: Vec<FeatureVector>,
    /// Present unless the target was dropped.
    pub target: Option<Vec<f64>>,
}

impl EncodedFrame {
    /// Column names in matrix order, with `charges` last when kept.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Feature::names();
        if self.target.is_some() {
            columns.push("charges");
        }
        columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Feature rows as an `(n_rows, N_FEATURES)` matrix.
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.rows.len(), N_FEATURES));
        for (mut out, row) in matrix.rows_mut().into_iter().zip(&self.rows) {
            out.assign(&ndarray::ArrayView1::from(row.as_slice()));
        }
        matrix
    }
}
