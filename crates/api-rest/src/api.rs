//! JSON endpoints.

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use predictor_core::{DiagnosisError, PatientRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub model_loaded: bool,
    pub dataset_rows: Option<usize>,
}

/// Measurements to score. Absent fields count as zero.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PredictReq {
    #[serde(rename = "Pregnancies", default)]
    pub pregnancies: Option<u32>,
    #[serde(rename = "Glucose", default)]
    pub glucose: Option<f64>,
    #[serde(rename = "BloodPressure", default)]
    pub blood_pressure: Option<f64>,
    #[serde(rename = "SkinThickness", default)]
    pub skin_thickness: Option<f64>,
    #[serde(rename = "Insulin", default)]
    pub insulin: Option<f64>,
    #[serde(rename = "BMI", default)]
    pub bmi: Option<f64>,
    #[serde(rename = "DiabetesPedigreeFunction", default)]
    pub diabetes_pedigree_function: Option<f64>,
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
}

impl From<PredictReq> for PatientRecord {
    fn from(req: PredictReq) -> Self {
        PatientRecord {
            pregnancies: req.pregnancies.unwrap_or_default(),
            glucose: req.glucose.unwrap_or_default(),
            blood_pressure: req.blood_pressure.unwrap_or_default(),
            skin_thickness: req.skin_thickness.unwrap_or_default(),
            insulin: req.insulin.unwrap_or_default(),
            bmi: req.bmi.unwrap_or_default(),
            diabetes_pedigree_function: req.diabetes_pedigree_function.unwrap_or_default(),
            age: req.age.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictRes {
    pub is_diabetic: bool,
    pub diabetes_type: String,
    pub future_risk_score: f64,
    pub future_risk_level: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Reports whether the model and dataset were loaded at startup. The service stays up without
/// them, so `ok` is true either way.
pub async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let model_loaded = state.prediction_service.is_ready();
    Json(HealthRes {
        ok: true,
        message: if model_loaded {
            "Predictor is alive".into()
        } else {
            "Predictor is alive; scoring unavailable".into()
        },
        model_loaded,
        dataset_rows: state.prediction_service.dataset_rows(),
    })
}

#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictReq,
    responses(
        (status = 200, description = "Diagnosis and risk", body = PredictRes),
        (status = 500, description = "Classifier failed"),
        (status = 503, description = "Classifier not loaded")
    )
)]
/// Score a record and return the diagnosis with its future risk projection
///
/// # Errors
/// Returns `503 Service Unavailable` if no classifier was loaded at startup, and
/// `500 Internal Server Error` if the classifier fails.
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictReq>,
) -> Result<Json<PredictRes>, (StatusCode, &'static str)> {
    match state.prediction_service.diagnose(req.into()) {
        Ok(prediction) => {
            let risk = prediction.risk();
            Ok(Json(PredictRes {
                is_diabetic: prediction.diagnosis.is_diabetic,
                diabetes_type: prediction.diagnosis.diabetes_type.to_string(),
                future_risk_score: risk.future_risk_score,
                future_risk_level: risk.future_risk_level.to_string(),
            }))
        }
        Err(e) => {
            tracing::error!("API prediction error: {:?}", e);
            Err(match e {
                DiagnosisError::InputParse(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
                DiagnosisError::ClassifierUnavailable => {
                    (StatusCode::SERVICE_UNAVAILABLE, "Classifier not loaded")
                }
                DiagnosisError::Scoring(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{router, SessionStore};
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use predictor_core::{Classifier, PredictionService, PredictorResult};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Fixed(u8);

    impl Classifier for Fixed {
        fn classify(&self, _record: &PatientRecord) -> PredictorResult<u8> {
            Ok(self.0)
        }
    }

    fn app(service: PredictionService) -> axum::Router {
        router(AppState::new(service, SessionStore::new("test-secret")))
    }

    fn json_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn absent_fields_default_to_zero() {
        let record: PatientRecord = PredictReq {
            glucose: Some(120.0),
            ..PredictReq::default()
        }
        .into();
        assert_eq!(record.glucose, 120.0);
        assert_eq!(record.pregnancies, 0);
        assert_eq!(record.age, 0.0);
    }

    #[tokio::test]
    async fn predict_returns_diagnosis_and_risk() {
        let response = app(PredictionService::new(Arc::new(Fixed(1))))
            .oneshot(json_post(r#"{"Glucose": 100, "BMI": 100, "Age": 100}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let res: PredictRes = json_body(response).await;
        assert!(res.is_diabetic);
        assert_eq!(res.diabetes_type, "Type 2");
        assert_eq!(res.future_risk_score, 100.0);
        assert_eq!(res.future_risk_level, "Moderate");
    }

    #[tokio::test]
    async fn predict_without_classifier_is_unavailable() {
        let response = app(PredictionService::unavailable())
            .oneshot(json_post("{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_reports_model_state() {
        let request = || Request::builder().uri("/health").body(Body::empty()).unwrap();

        let res: HealthRes = json_body(
            app(PredictionService::unavailable())
                .oneshot(request())
                .await
                .unwrap(),
        )
        .await;
        assert!(res.ok);
        assert!(!res.model_loaded);

        let res: HealthRes = json_body(
            app(PredictionService::new(Arc::new(Fixed(0))))
                .oneshot(request())
                .await
                .unwrap(),
        )
        .await;
        assert!(res.model_loaded);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app(PredictionService::unavailable())
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = json_body(response).await;
        assert!(doc["paths"]["/api/predict"].is_object());
    }
}
