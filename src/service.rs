//! Prediction service: validate -> transform -> artifact -> inverse scale.
//!
//! The service holds one immutable snapshot of (fitted preprocessor,
//! artifact). Requests clone the snapshot pointer and run without further
//! locking; [`PredictionService::swap`] publishes a new snapshot for requests
//! that start afterwards.

use crate::dataset::{RawRecord, Record};
use crate::model::{ModelLoadError, ModelRegistry, PredictionError, RegressionArtifact};
use crate::preprocessing::error::ValidationError;
use crate::preprocessing::preprocessor::FittedPreprocessor;
use crate::preprocessing::validation::InputBounds;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

/// Caller-facing failure classes of the service.
#[derive(Debug)]
pub enum ServiceError {
    /// The caller's input was rejected.
    Validation(ValidationError),
    /// The model could not be loaded.
    ModelLoad(ModelLoadError),
    /// Preprocessing or the artifact call failed.
    Prediction(PredictionError),
}

impl ServiceError {
    /// True when the failure is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }

    /// Message safe to return to a caller. Only validation errors are
    /// echoed; everything else is generic.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(err) => err.to_string(),
            ServiceError::ModelLoad(_) | ServiceError::Prediction(_) => {
                "Prediction failed".to_string()
            }
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(err) => write!(f, "{}", err),
            ServiceError::ModelLoad(err) => write!(f, "{}", err),
            ServiceError::Prediction(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Validation(err) => Some(err),
            ServiceError::ModelLoad(err) => Some(err),
            ServiceError::Prediction(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err)
    }
}

impl From<ModelLoadError> for ServiceError {
    fn from(err: ModelLoadError) -> Self {
        ServiceError::ModelLoad(err)
    }
}

impl From<PredictionError> for ServiceError {
    fn from(err: PredictionError) -> Self {
        ServiceError::Prediction(err)
    }
}

/// A successful prediction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted charges, rounded to 2 decimals.
    pub value: f64,
    /// The validated input the prediction was made for.
    pub input: Record,
    pub model_version: String,
}

struct Snapshot {
    preprocessor: Arc<FittedPreprocessor>,
    artifact: Arc<dyn RegressionArtifact>,
}

/// Serves predictions from an injected preprocessor and artifact.
pub struct PredictionService {
    current: RwLock<Arc<Snapshot>>,
}

impl PredictionService {
    pub fn new(
        preprocessor: Arc<FittedPreprocessor>,
        artifact: Arc<dyn RegressionArtifact>,
    ) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot {
                preprocessor,
                artifact,
            })),
        }
    }

    /// Build a service whose artifact is resolved through the registry.
    pub fn from_registry(
        preprocessor: Arc<FittedPreprocessor>,
        registry: &ModelRegistry,
        name: &str,
        model_dir: &Path,
    ) -> Result<Self, ModelLoadError> {
        let artifact = registry.load(name, model_dir)?;
        Ok(Self::new(preprocessor, artifact))
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Version of the artifact currently served.
    pub fn model_version(&self) -> String {
        self.snapshot().artifact.version().to_string()
    }

    /// Input bounds enforced by the current preprocessor.
    pub fn bounds(&self) -> InputBounds {
        *self.snapshot().preprocessor.bounds()
    }

    /// Validate raw input and predict charges.
    pub fn predict(&self, raw: &RawRecord) -> Result<Prediction, ServiceError> {
        let snapshot = self.snapshot();

        let record = snapshot.preprocessor.validator().validate(raw).map_err(|err| {
            warn!(field = %err.field, error = %err, "rejected prediction input");
            err
        })?;

        let value = Self::run(&snapshot, &record).map_err(|err| {
            error!(
                age = record.age,
                sex = record.sex.as_str(),
                bmi = record.bmi,
                children = record.children,
                smoker = record.smoker.as_str(),
                region = record.region.as_str(),
                model_version = %snapshot.artifact.version(),
                error = %err,
                "prediction failed"
            );
            err
        })?;

        let prediction = Prediction {
            value: (value * 100.0).round() / 100.0,
            input: record,
            model_version: snapshot.artifact.version().to_string(),
        };
        debug!(value = prediction.value, model_version = %prediction.model_version, "prediction served");
        Ok(prediction)
    }

    /// Predict for an already typed record. Only the numeric bounds are
    /// checked; the categorical fields are trusted as typed.
    ///
    /// Returns the unrounded value in charges units.
    pub fn predict_record(&self, record: &Record) -> Result<f64, PredictionError> {
        Self::run(&self.snapshot(), record)
    }

    fn run(snapshot: &Snapshot, record: &Record) -> Result<f64, PredictionError> {
        let features = snapshot.preprocessor.transform_one(&record.without_target())?;
        let scaled = snapshot.artifact.predict(&features)?;
        if !scaled.is_finite() {
            return Err(PredictionError::NonFinite { value: scaled });
        }
        Ok(snapshot.preprocessor.inverse_transform_target(scaled))
    }

    /// Replace the served (preprocessor, artifact) pair.
    pub fn swap(&self, preprocessor: Arc<FittedPreprocessor>, artifact: Arc<dyn RegressionArtifact>) {
        let version = artifact.version().to_string();
        let next = Arc::new(Snapshot {
            preprocessor,
            artifact,
        });
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
        info!(model_version = %version, "model snapshot swapped");
    }

    /// Load `name` through the registry and swap it in with `preprocessor`.
    ///
    /// On failure the current snapshot keeps serving.
    pub fn reload(
        &self,
        preprocessor: Arc<FittedPreprocessor>,
        registry: &ModelRegistry,
        name: &str,
        model_dir: &Path,
    ) -> Result<(), ServiceError> {
        let artifact = registry.load(name, model_dir).map_err(|err| {
            error!(name = %name, error = %err, "model reload failed");
            err
        })?;
        self.swap(preprocessor, artifact);
        Ok(())
    }
}
