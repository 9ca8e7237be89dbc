use anyhow::Context;
use insurance_charges::api::{self, AppState};
use insurance_charges::config::ServiceConfig;
use insurance_charges::dataset;
use insurance_charges::model::ModelRegistry;
use insurance_charges::preprocessing::{FittedPreprocessor, Preprocessor};
use insurance_charges::service::PredictionService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = ServiceConfig::from_env()?;

    let preprocessor = Arc::new(load_preprocessor(&config)?);
    let service = PredictionService::from_registry(
        preprocessor,
        &ModelRegistry::builtin(),
        &config.model_name,
        &config.model_dir,
    )
    .with_context(|| format!("loading model '{}'", config.model_name))?;

    let state = AppState::new(Arc::new(service), config.api_key.clone());
    let app = api::router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, model = %config.model_name, "listening");

    let server = axum::serve(listener, app.into_make_service());

    tokio::select! {
        r = server => { r?; }
        _ = tokio::signal::ctrl_c() => { info!("shutdown"); }
    }
    Ok(())
}

/// Load the persisted preprocessor state if there is one, otherwise fit on
/// the training CSV (and persist the result when a state path is configured).
fn load_preprocessor(config: &ServiceConfig) -> anyhow::Result<FittedPreprocessor> {
    if let Some(path) = config.preprocessor_state.as_ref().filter(|p| p.exists()) {
        let fitted = FittedPreprocessor::load_from_file(path)
            .with_context(|| format!("loading preprocessor state {}", path.display()))?;
        info!(path = %path.display(), "preprocessor state loaded");
        return Ok(fitted);
    }

    let records = dataset::load_csv(&config.dataset_path)
        .with_context(|| format!("reading dataset {}", config.dataset_path.display()))?;
    let fitted = Preprocessor::new().fit(&records)?;
    info!(
        rows = records.len(),
        path = %config.dataset_path.display(),
        "preprocessor fitted"
    );

    if let Some(path) = &config.preprocessor_state {
        fitted
            .save_to_file(path)
            .with_context(|| format!("saving preprocessor state {}", path.display()))?;
        info!(path = %path.display(), "preprocessor state saved");
    }
    Ok(fitted)
}
