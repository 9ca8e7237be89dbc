//! Categorical feature encoding transformers.
//!
//! # Available Encoders
//!
//! ## CategoricalEncoder
//! Stateless: maps `sex`/`smoker` to 0/1 flags and expands `region` into
//! four 0/1 indicator columns.
//!
//! ## TargetStatsEncoder
//! Fitted: attaches the training-set mean of `charges` for each discrete
//! column value.
//!
//! ```ignore
//! let encoded = CategoricalEncoder::new().encode_all(&records);
//! let stats = TargetStatsEncoder::new().fit(&encoded)?;
//! let means = stats.transform(&encoded[0])?;
//! ```

mod categorical;
mod target_stats;

pub use categorical::{CategoricalColumn, CategoricalEncoder, EncodedRecord};
pub use target_stats::{
    FittedTargetStatsEncoder, TargetMeans, TargetStatsEncoder, TargetStatsParams,
};
