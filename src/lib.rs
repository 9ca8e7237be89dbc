//! Preprocessing and prediction serving for a medical insurance charges
//! regressor.
//!
//! The crate turns raw insurance records (`age, sex, bmi, children, smoker,
//! region`) into an 18-column feature row and maps a trained regressor's
//! output back to charges:
//!
//! ```text
//! RawRecord -> SchemaValidator -> CategoricalEncoder -> TargetStatsEncoder
//!           -> BinEncoder(age, bmi) -> FeatureScaler -> RegressionArtifact
//!           -> inverse target scaling
//! ```
//!
//! Every fitted stage follows the [`Transformer`] / [`FittedTransformer`]
//! split: fit once on the training set, then transform with immutable,
//! serializable state.
//!
//! # Example
//! ```ignore
//! use insurance_charges::prelude::*;
//! use std::sync::Arc;
//!
//! let records = dataset::load_csv("insurance.csv")?;
//! let preprocessor = Arc::new(Preprocessor::new().fit(&records)?);
//! let artifact = ModelRegistry::builtin().load("v1", "models".as_ref())?;
//!
//! let service = PredictionService::new(preprocessor, artifact);
//! let prediction = service.predict(&raw)?;
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod model;
pub mod preprocessing;
pub mod serialization;
pub mod service;

pub use preprocessing::{FittedTransformer, Transformer};

pub mod prelude {
    pub use crate::dataset::{self, RawRecord, Record, Region, Sex, Smoker};
    pub use crate::model::{
        LinearArtifact, ModelLoadError, ModelRegistry, PredictionError, RegressionArtifact,
    };
    pub use crate::preprocessing::{
        Feature, FeatureVector, FittedPreprocessor, FittedTransformer, PreprocessingError,
        Preprocessor, TransformOptions, Transformer,
    };
    pub use crate::service::{Prediction, PredictionService, ServiceError};
}
