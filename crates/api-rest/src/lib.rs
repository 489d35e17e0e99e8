//! # API REST
//!
//! Web front end and REST API for the diabetes predictor.
//!
//! Handles:
//! - HTML pages and form submission with axum
//! - Server-side sessions carrying the latest diagnosis between requests
//! - A JSON prediction endpoint with OpenAPI/Swagger documentation
//!
//! Uses `predictor-core` for all prediction logic.

#![warn(rust_2018_idioms)]

pub mod api;
pub mod pages;
pub mod session;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use predictor_core::constants::DEFAULT_DASHBOARD_TYPE;
use predictor_core::{PredictionService, RiskAssessment};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use session::{SessionData, SessionStore};

/// Application state shared across request handlers
///
/// Holds the prediction service loaded at startup and the session store. Both are built once
/// by the caller and injected here; handlers never touch process-wide state.
#[derive(Clone)]
pub struct AppState {
    prediction_service: Arc<PredictionService>,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(prediction_service: PredictionService, sessions: SessionStore) -> Self {
        Self {
            prediction_service: Arc::new(prediction_service),
            sessions,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(api::health, api::predict),
    components(schemas(api::HealthRes, api::PredictReq, api::PredictRes))
)]
pub struct ApiDoc;

/// Build the application router.
///
/// # Routes
/// - `GET /` landing page
/// - `GET /index` input form
/// - `POST /predict` form submission, renders the diagnosis
/// - `GET /dashboard` guidance for `?diabetes_type=` (default "Type 2")
/// - `GET /future_risk_dashboard` risk from the session, or redirect to `/`
/// - `GET /health`, `POST /api/predict` JSON API, documented at `/swagger-ui`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/index", get(index))
        .route("/predict", post(predict))
        .route("/dashboard", get(dashboard))
        .route("/future_risk_dashboard", get(future_risk_dashboard))
        .route("/health", get(api::health))
        .route("/api/predict", post(api::predict))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn index() -> Html<String> {
    Html(pages::index())
}

/// Diagnose the submitted form
///
/// On success the diagnosis label and the parsed record are written to the caller's session
/// and the result page is rendered. Any failure renders "Error in detection" and leaves the
/// session untouched.
#[axum::debug_handler]
async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    match state.prediction_service.diagnose_form(&fields) {
        Ok(prediction) => {
            let existing = state.sessions.session_id(&headers);
            let id = state.sessions.update(existing, |session| {
                session.diabetes_type = Some(prediction.diagnosis.diabetes_type);
                session.user_input = Some(prediction.record);
            });

            (
                [(header::SET_COOKIE, state.sessions.cookie(id))],
                Html(pages::result(Some(&prediction.diagnosis))),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("error in prediction: {}", e);
            Html(pages::result(None)).into_response()
        }
    }
}

async fn dashboard(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let diabetes_type = params
        .get("diabetes_type")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DASHBOARD_TYPE);
    Html(pages::dashboard(diabetes_type))
}

/// Project future risk from the record stored by the last prediction
///
/// Without session data there is nothing to assess, so the client is sent back to `/`.
#[axum::debug_handler]
async fn future_risk_dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let record = state
        .sessions
        .session_id(&headers)
        .and_then(|id| state.sessions.get(id))
        .and_then(|session| session.user_input);

    let Some(record) = record else {
        return Redirect::to("/").into_response();
    };

    let risk = RiskAssessment::from_record(&record);
    tracing::debug!(
        "future risk score {:.2} ({})",
        risk.future_risk_score,
        risk.future_risk_level
    );
    Html(pages::future_risk(&record, &risk)).into_response()
}
