//! Fit/transform split shared by every preprocessing stage.
//!
//! A [`Transformer`] holds configuration only. Calling `fit` on training data
//! yields a [`FittedTransformer`], which owns the learned state and is the
//! only thing allowed to transform records afterwards.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// An unfitted stage: configuration plus a `fit` step.
///
/// `Input` is whatever the stage learns from (a single column, a matrix or a
/// batch of encoded rows). `Fitted` persists through `Params`.
pub trait Transformer: Clone {
    type Input: ?Sized;
    type Params: SerializableParams;
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Learn state from `data`.
    ///
    /// Fails on empty input and on values the stage cannot learn from
    /// (non-finite numbers, a missing target).
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;
}

/// A stage with learned state.
///
/// `from_params(x.extract_params())` rebuilds an equivalent stage, and
/// `transform` never changes the state it reads.
pub trait FittedTransformer: Clone + Sized {
    type Input: ?Sized;
    type Output;
    type Params: SerializableParams;

    /// Apply the learned state to `data`.
    ///
    /// Input the fitted state does not cover is an error; no stage falls
    /// back to a default value.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    fn extract_params(&self) -> Self::Params;

    /// Rebuild from persisted state, rejecting parameters that could not
    /// have come out of `fit`.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>;

    /// Write the learned state to `path` as bincode.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let encoded = self
            .extract_params()
            .to_bytes()
            .map_err(std::io::Error::other)?;
        std::fs::write(path, encoded)
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError> {
        let encoded = std::fs::read(path)?;
        Self::Params::from_bytes(&encoded)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))
            .and_then(Self::from_params)
    }
}
