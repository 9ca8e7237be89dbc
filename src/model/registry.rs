//! Static registry from model name to artifact loader.

use crate::model::error::ModelLoadError;
use crate::model::linear::LinearArtifact;
use crate::model::RegressionArtifact;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads an artifact of the given version from a model directory.
pub type ArtifactLoader = fn(&Path, &str) -> Result<Arc<dyn RegressionArtifact>, ModelLoadError>;

/// One registered model.
#[derive(Clone)]
pub struct ModelSpec {
    pub name: String,
    pub version: String,
    pub loader: ArtifactLoader,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>, loader: ArtifactLoader) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            loader,
        }
    }

    /// Load this model's artifact from `dir`.
    pub fn load(&self, dir: &Path) -> Result<Arc<dyn RegressionArtifact>, ModelLoadError> {
        (self.loader)(dir, &self.version)
    }
}

impl std::fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSpec")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

fn load_linear(dir: &Path, version: &str) -> Result<Arc<dyn RegressionArtifact>, ModelLoadError> {
    let path = LinearArtifact::artifact_path(dir, version);
    let artifact = LinearArtifact::load_from_file(&path, version)?;
    Ok(Arc::new(artifact))
}

/// Name → model table.
#[derive(Clone, Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelSpec>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the models shipped with this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ModelSpec::new("v1", "0.1.0", load_linear));
        registry
    }

    /// Add or replace a model.
    pub fn register(&mut self, spec: ModelSpec) {
        debug!(name = %spec.name, version = %spec.version, "registering model");
        self.models.insert(spec.name.clone(), spec);
    }

    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn resolve(&self, name: &str) -> Result<&ModelSpec, ModelLoadError> {
        self.models
            .get(name)
            .ok_or_else(|| ModelLoadError::UnknownModel {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Resolve `name` and load its artifact from `dir`.
    pub fn load(
        &self,
        name: &str,
        dir: &Path,
    ) -> Result<Arc<dyn RegressionArtifact>, ModelLoadError> {
        let spec = self.resolve(name)?;
        let artifact = spec.load(dir)?;
        info!(
            name = %name,
            version = %artifact.version(),
            dir = %dir.display(),
            "model artifact loaded"
        );
        Ok(artifact)
    }
}
