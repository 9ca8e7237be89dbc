//! HTTP interface over [`PredictionService`].
//!
//! | Route | Method | Response |
//! |-------|--------|----------|
//! | `/`, `/health` | GET | `{"health_check": "OK", "model_version": ..}` |
//! | `/prediction/` | POST | `{"predicted_medical_insurance_cost": .., "details": {..}}` |
//!
//! When an API key is configured every route requires an `Authorization`
//! header equal to it.

use crate::dataset::{RawRecord, Record};
use crate::service::{PredictionService, ServiceError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>, api_key: Option<String>) -> Self {
        Self {
            service,
            api_key: api_key.map(Arc::from),
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.api_key.as_deref() else {
            return Ok(());
        };
        let provided = headers
            .get(header::AUTHORIZATION)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if bool::from(provided.ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            warn!("rejected request with invalid credentials");
            Err(ApiError::Forbidden)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/prediction/", post(predict))
        .with_state(state)
}

/// Prediction request body.
#[derive(Clone, Debug, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Bmi")]
    pub bmi: f64,
    #[serde(rename = "Children")]
    pub children: i64,
    #[serde(rename = "Smoker")]
    pub smoker: String,
    #[serde(rename = "Region")]
    pub region: String,
}

impl From<PredictionRequest> for RawRecord {
    fn from(req: PredictionRequest) -> Self {
        RawRecord {
            age: req.age,
            sex: req.sex,
            bmi: req.bmi,
            children: req.children,
            smoker: req.smoker,
            region: req.region,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub health_check: String,
    pub model_version: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionDetails {
    pub input_data: Record,
    pub model_version: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub predicted_medical_insurance_cost: f64,
    pub details: PredictionDetails,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Errors returned to HTTP callers.
#[derive(Debug)]
pub enum ApiError {
    Forbidden,
    BadRequest(String),
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.public_message())
        } else {
            ApiError::Internal(err.public_message())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Could not validate credentials".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

pub async fn health(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HealthResponse>, ApiError> {
    state.authorize(&headers)?;
    Ok(Json(HealthResponse {
        health_check: "OK".to_string(),
        model_version: state.service.model_version(),
    }))
}

pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    state.authorize(&headers)?;
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "malformed prediction body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let prediction = state.service.predict(&request.into())?;
    info!(
        value = prediction.value,
        model_version = %prediction.model_version,
        "prediction made"
    );

    Ok(Json(PredictionResponse {
        predicted_medical_insurance_cost: prediction.value,
        details: PredictionDetails {
            input_data: prediction.input,
            model_version: prediction.model_version,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Region, Sex, Smoker};
    use crate::model::LinearArtifact;
    use crate::preprocessing::features::{Feature, FeatureVector};
    use crate::preprocessing::preprocessor::Preprocessor;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn service() -> Arc<PredictionService> {
        let row = |age, sex, bmi, children, smoker, region, charges| Record {
            age,
            sex,
            bmi,
            children,
            smoker,
            region,
            charges: Some(charges),
        };
        let training = vec![
            row(18, Sex::Male, 15.0, 0, Smoker::No, Region::Northeast, 1000.0),
            row(40, Sex::Female, 30.0, 1, Smoker::Yes, Region::Northwest, 30000.0),
            row(52, Sex::Male, 42.0, 0, Smoker::No, Region::Southeast, 11000.0),
            row(64, Sex::Female, 50.0, 2, Smoker::No, Region::Southwest, 16000.0),
        ];
        let preprocessor = Preprocessor::new().fit(&training).unwrap();
        let mut weights = FeatureVector::zeros();
        weights[Feature::Age] = 1.0;
        let artifact = LinearArtifact::new("0.1.0", weights, 0.0);
        Arc::new(PredictionService::new(Arc::new(preprocessor), Arc::new(artifact)))
    }

    fn app(api_key: Option<&str>) -> Router {
        router(AppState::new(service(), api_key.map(String::from)))
    }

    fn prediction_request(body: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/prediction/")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = key {
            builder = builder.header(header::AUTHORIZATION, key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const VALID_BODY: &str = r#"{"Age":64,"Sex":"male","Bmi":30,"Children":0,"Smoker":"no","Region":"northwest"}"#;

    #[tokio::test]
    async fn test_health() {
        for uri in ["/", "/health"] {
            let response = app(None)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body: HealthResponse = read_json(response).await;
            assert_eq!(body.health_check, "OK");
            assert_eq!(body.model_version, "0.1.0");
        }
    }

    #[tokio::test]
    async fn test_prediction() {
        let response = app(None)
            .oneshot(prediction_request(VALID_BODY, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: PredictionResponse = read_json(response).await;
        assert_eq!(body.predicted_medical_insurance_cost, 30000.0);
        assert_eq!(body.details.model_version, "0.1.0");
        assert_eq!(body.details.input_data.age, 64);
        assert_eq!(body.details.input_data.region, Region::Northwest);
    }

    #[tokio::test]
    async fn test_api_key_required() {
        let response = app(Some("secret"))
            .oneshot(prediction_request(VALID_BODY, Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: ErrorBody = read_json(response).await;
        assert_eq!(body.detail, "Could not validate credentials");

        let response = app(Some("secret"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(Some("secret"))
            .oneshot(prediction_request(VALID_BODY, Some("secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_out_of_range_is_bad_request() {
        let body = r#"{"Age":80,"Sex":"male","Bmi":30,"Children":0,"Smoker":"no","Region":"northwest"}"#;
        let response = app(None)
            .oneshot(prediction_request(body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = read_json(response).await;
        assert!(body.detail.contains("age"));
    }

    #[tokio::test]
    async fn test_invalid_enum_is_bad_request() {
        let body = r#"{"Age":30,"Sex":"male","Bmi":30,"Children":0,"Smoker":"no","Region":"atlantis"}"#;
        let response = app(None)
            .oneshot(prediction_request(body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = app(None)
            .oneshot(prediction_request(r#"{"Age":"old"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_server_errors_are_generic() {
        let err = ServiceError::Prediction(crate::model::PredictionError::NonFinite {
            value: f64::NAN,
        });
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = read_json(response).await;
        assert_eq!(body.detail, "Prediction failed");
    }

    #[tokio::test]
    async fn test_drift_is_generic_server_error() {
        // Training ages 18, 40, 52, 64 leave (24.6, 31.1] empty
        let body = r#"{"Age":28,"Sex":"male","Bmi":30,"Children":0,"Smoker":"no","Region":"northwest"}"#;
        let response = app(None)
            .oneshot(prediction_request(body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = read_json(response).await;
        assert_eq!(body.detail, "Prediction failed");
        assert!(!body.detail.contains("age"));
    }

    #[tokio::test]
    async fn test_api_key_prefix_rejected() {
        let response = app(Some("secret"))
            .oneshot(prediction_request(VALID_BODY, Some("secre")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(Some("secret"))
            .oneshot(prediction_request(VALID_BODY, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
