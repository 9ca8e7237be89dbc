//! Preprocessing of insurance records into model-ready feature rows.
//!
//! All stages follow the same fitted/unfitted split:
//!
//! - [`Transformer`]: unfitted stage with hyperparameters, learns from training data
//! - [`FittedTransformer`]: fitted stage, ready for inference and serialization
//!
//! # Stages
//!
//! | Stage | Fitted | Purpose |
//! |-------|--------|---------|
//! | [`SchemaValidator`] | bounds | Reject input outside the fitted domain |
//! | [`CategoricalEncoder`] | no | 0/1 flags and region indicators |
//! | [`TargetStatsEncoder`] | yes | Mean `charges` per category value |
//! | [`BinEncoder`] | yes | Equal-width ordinal bins for `age` and `bmi` |
//! | [`FeatureScaler`] | yes | Min/max scaling of features and target |
//!
//! [`Preprocessor`] chains them in a fixed order and produces a
//! [`FittedPreprocessor`].
//!
//! # Example
//!
//! ```ignore
//! use insurance_charges::preprocessing::{Preprocessor, TransformOptions};
//!
//! let fitted = Preprocessor::new().fit(&training)?;
//! let frame = fitted.transform(&records, TransformOptions::inference())?;
//!
//! fitted.save_to_file("preprocessor.bin")?;
//! let loaded = FittedPreprocessor::load_from_file("preprocessor.bin")?;
//! ```

pub mod binning;
pub mod encoding;
pub mod error;
pub mod features;
pub mod preprocessor;
pub mod scaling;
pub mod traits;
pub mod validation;

pub use binning::{BinEncoder, BinEncoderParams, BinInterval, FittedBinEncoder, DEFAULT_BINS};
pub use encoding::{
    CategoricalColumn, CategoricalEncoder, EncodedRecord, FittedTargetStatsEncoder, TargetMeans,
    TargetStatsEncoder, TargetStatsParams,
};
pub use error::{PreprocessingError, ValidationError, ValidationErrorKind};
pub use features::{assemble, EncodedFrame, Feature, FeatureVector, N_FEATURES};
pub use preprocessor::{FittedPreprocessor, FittedPreprocessorState, Preprocessor, TransformOptions};
pub use scaling::{
    FeatureScaler, FeatureScalerParams, FittedFeatureScaler, FittedMinMaxScaler, MinMaxScaler,
    MinMaxScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
pub use validation::{InputBounds, SchemaValidator};
