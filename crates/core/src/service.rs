//! Prediction service.
//!
//! Owns the classifier loaded at startup and runs the full request flow: input extraction,
//! scoring and diagnosis refinement. Failures come back as [`DiagnosisError`] values rather
//! than panics, so callers decide how to present them.

use crate::config::CoreConfig;
use crate::dataset::Dataset;
use crate::diagnosis::{DiagnosisError, DiagnosisResult};
use crate::model::{Classifier, ModelArtifact};
use crate::record::PatientRecord;
use crate::risk::RiskAssessment;
use std::collections::HashMap;
use std::sync::Arc;

/// A scored record and its diagnosis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub record: PatientRecord,
    pub diagnosis: DiagnosisResult,
}

impl Prediction {
    pub fn risk(&self) -> RiskAssessment {
        RiskAssessment::from_record(&self.record)
    }
}

/// Pure prediction operations - no HTTP concerns
#[derive(Clone)]
pub struct PredictionService {
    classifier: Option<Arc<dyn Classifier>>,
    dataset_rows: Option<usize>,
}

impl PredictionService {
    /// Creates a service around an already loaded classifier.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
            dataset_rows: None,
        }
    }

    /// Creates a service with scoring disabled.
    pub fn unavailable() -> Self {
        Self {
            classifier: None,
            dataset_rows: None,
        }
    }

    /// Loads the dataset and model named in `cfg`.
    ///
    /// Never fails: if either file is missing or corrupt the error is logged and the returned
    /// service has scoring disabled.
    pub fn load(cfg: &CoreConfig) -> Self {
        tracing::debug!("loading dataset and model");

        let loaded = Dataset::load_csv(cfg.dataset_path()).and_then(|dataset| {
            ModelArtifact::load(cfg.model_path()).map(|model| (dataset, model))
        });

        match loaded {
            Ok((dataset, model)) => {
                tracing::info!(
                    "dataset ({} rows) and model ({} trees) loaded successfully",
                    dataset.n_samples(),
                    model.forest.n_trees()
                );
                Self {
                    classifier: Some(Arc::new(model)),
                    dataset_rows: Some(dataset.n_samples()),
                }
            }
            Err(e) => {
                tracing::error!("error loading dataset or model: {}", e);
                Self::unavailable()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }

    /// Rows in the reference dataset, if it was loaded.
    pub fn dataset_rows(&self) -> Option<usize> {
        self.dataset_rows
    }

    /// Parse raw form fields and diagnose the resulting record.
    pub fn diagnose_form(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<Prediction, DiagnosisError> {
        let record = PatientRecord::from_form(fields).map_err(DiagnosisError::InputParse)?;
        self.diagnose(record)
    }

    /// Score a record and refine the label into a diabetes type.
    pub fn diagnose(&self, record: PatientRecord) -> Result<Prediction, DiagnosisError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(DiagnosisError::ClassifierUnavailable)?;

        let label = classifier
            .classify(&record)
            .map_err(DiagnosisError::Scoring)?;
        tracing::debug!(
            "prediction result: {} (1 = Diabetic, 0 = Non-Diabetic)",
            label
        );

        let diagnosis = DiagnosisResult::refine(label == 1, &record);
        tracing::debug!(
            "result: {}, diabetes type: {}",
            diagnosis.summary(),
            diagnosis.diabetes_type
        );

        Ok(Prediction { record, diagnosis })
    }
}
