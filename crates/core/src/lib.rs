//! # Predictor Core
//!
//! Core logic for the diabetes prediction service.
//!
//! This crate contains the prediction pipeline and the model it depends on:
//! - Form input extraction into a fixed eight-feature [`PatientRecord`]
//! - A random-forest [`Classifier`] persisted as a JSON model artifact
//! - Diagnosis refinement into a diabetes type, and future risk projection
//! - Training from a labelled CSV dataset
//!
//! **No API concerns**: HTTP routing, sessions and page rendering belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod diagnosis;
pub mod error;
pub mod model;
pub mod record;
pub mod risk;
pub mod service;
pub mod trainer;

pub use config::CoreConfig;
pub use dataset::Dataset;
pub use diagnosis::{DiabetesType, DiagnosisError, DiagnosisResult};
pub use error::{PredictorError, PredictorResult};
pub use model::{Classifier, ModelArtifact};
pub use record::PatientRecord;
pub use risk::{RiskAssessment, RiskLevel};
pub use service::{Prediction, PredictionService};
