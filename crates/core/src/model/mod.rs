//! Classifier abstraction and the persisted model artifact.

pub mod forest;
pub mod tree;

pub use forest::{ForestConfig, RandomForest};
pub use tree::{DecisionTree, TreeConfig, TreeNode};

use crate::constants::FEATURE_NAMES;
use crate::record::PatientRecord;
use crate::{PredictorError, PredictorResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Binary decision function over a patient record.
///
/// Implementations must be deterministic: the same record always yields the same label.
pub trait Classifier: Send + Sync {
    /// Returns `1` for diabetic and `0` otherwise.
    fn classify(&self, record: &PatientRecord) -> PredictorResult<u8>;
}

impl Classifier for RandomForest {
    fn classify(&self, record: &PatientRecord) -> PredictorResult<u8> {
        self.predict(&record.features())
    }
}

/// Trained forest plus the metadata written alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub test_accuracy: Option<f64>,
    pub forest: RandomForest,
}

impl ModelArtifact {
    pub fn new(forest: RandomForest, test_accuracy: Option<f64>) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trained_at: Utc::now(),
            test_accuracy,
            forest,
        }
    }

    /// Write the artifact as JSON.
    pub fn save(&self, path: &Path) -> PredictorResult<()> {
        let file = File::create(path).map_err(|source| PredictorError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).map_err(PredictorError::Serialization)?;
        writer.flush().map_err(|source| PredictorError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read an artifact, check it was trained on the expected feature schema and that every
    /// tree is structurally sound.
    pub fn load(path: &Path) -> PredictorResult<Self> {
        let file = File::open(path).map_err(|source| PredictorError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(PredictorError::Deserialization)?;

        if !artifact.feature_names.iter().map(String::as_str).eq(FEATURE_NAMES) {
            return Err(PredictorError::FeatureMismatch {
                found: artifact.feature_names,
            });
        }
        if artifact.forest.n_trees() == 0 {
            return Err(PredictorError::UnfittedModel);
        }
        artifact.forest.validate()?;

        Ok(artifact)
    }
}

impl Classifier for ModelArtifact {
    fn classify(&self, record: &PatientRecord) -> PredictorResult<u8> {
        self.forest.classify(record)
    }
}
