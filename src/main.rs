use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{session, AppState, SessionStore};
use predictor_core::config::{dataset_path_from_env_value, model_path_from_env_value};
use predictor_core::{CoreConfig, PredictionService};

/// Main entry point for the diabetes predictor web application
///
/// Loads the dataset and model once, then serves the web pages and JSON API until Ctrl-C.
/// A failed load is logged and the server still starts, with scoring disabled.
///
/// # Environment Variables
/// - `PREDICTOR_REST_ADDR`: server address (default: "0.0.0.0:5001")
/// - `PREDICTOR_DATASET_PATH`: reference dataset CSV (default: "diabetes.csv")
/// - `PREDICTOR_MODEL_PATH`: trained model artifact (default: "model.json")
/// - `PREDICTOR_SESSION_SECRET`: key for signing session cookies (default: random per process)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("predictor_run=info".parse()?)
                .add_directive("predictor_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PREDICTOR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".into());

    let session_secret = match std::env::var("PREDICTOR_SESSION_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            tracing::warn!(
                "PREDICTOR_SESSION_SECRET not set; sessions will not survive a restart"
            );
            session::generate_secret()
        }
    };

    let cfg = CoreConfig::new(
        dataset_path_from_env_value(std::env::var("PREDICTOR_DATASET_PATH").ok()),
        model_path_from_env_value(std::env::var("PREDICTOR_MODEL_PATH").ok()),
        session_secret,
    )?;

    let prediction_service = PredictionService::load(&cfg);
    let state = AppState::new(prediction_service, SessionStore::new(cfg.session_secret()));
    let app = api_rest::router(state);

    tracing::info!("++ Starting diabetes predictor on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Diabetes predictor stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
