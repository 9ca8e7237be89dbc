//! Scaling transformers for feature normalization.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`MinMaxScaler`] | Per-column scaling to `[0, 1]` |
//! | [`FeatureScaler`] | MinMax over the encoded features plus a separate one over the target |
//!
//! ```ignore
//! let fitted = FeatureScaler::new().fit(&frame)?;
//! let scaled = fitted.transform(&frame.rows[0])?;
//! let charges = fitted.inverse_transform_target(0.42);
//! ```

pub mod feature_scaler;
pub mod minmax;

pub use feature_scaler::{FeatureScaler, FeatureScalerParams, FittedFeatureScaler};
pub use minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerParams};
