//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so no
//! request handler reads process-wide environment variables.

use crate::constants::{DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH};
use crate::{PredictorError, PredictorResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    dataset_path: PathBuf,
    model_path: PathBuf,
    session_secret: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PredictorError::InvalidInput` if either path or the session secret is empty.
    pub fn new(
        dataset_path: PathBuf,
        model_path: PathBuf,
        session_secret: String,
    ) -> PredictorResult<Self> {
        if dataset_path.as_os_str().is_empty() {
            return Err(PredictorError::InvalidInput(
                "dataset path cannot be empty".into(),
            ));
        }
        if model_path.as_os_str().is_empty() {
            return Err(PredictorError::InvalidInput(
                "model path cannot be empty".into(),
            ));
        }
        if session_secret.trim().is_empty() {
            return Err(PredictorError::InvalidInput(
                "session secret cannot be empty".into(),
            ));
        }

        Ok(Self {
            dataset_path,
            model_path,
            session_secret,
        })
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }
}

/// Resolve a file path from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn path_from_env_value(value: Option<String>, default: &str) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Resolve the dataset path, falling back to `diabetes.csv` in the working directory.
pub fn dataset_path_from_env_value(value: Option<String>) -> PathBuf {
    path_from_env_value(value, DEFAULT_DATASET_PATH)
}

/// Resolve the model artifact path, falling back to `model.json` in the working directory.
pub fn model_path_from_env_value(value: Option<String>) -> PathBuf {
    path_from_env_value(value, DEFAULT_MODEL_PATH)
}
