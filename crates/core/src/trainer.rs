//! Model training.
//!
//! Splits a labelled CSV into train/test partitions, fits a random forest, writes the model
//! artifact and reports held-out accuracy.

use crate::constants::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO};
use crate::dataset::Dataset;
use crate::model::{ForestConfig, ModelArtifact, RandomForest};
use crate::{PredictorError, PredictorResult};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub test_ratio: f64,
    pub split_seed: u64,
    pub forest: ForestConfig,
}

impl TrainConfig {
    pub fn new(dataset_path: PathBuf, model_path: PathBuf) -> Self {
        Self {
            dataset_path,
            model_path,
            test_ratio: DEFAULT_TEST_RATIO,
            split_seed: DEFAULT_SPLIT_SEED,
            forest: ForestConfig::default(),
        }
    }
}

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model_path: PathBuf,
    pub train_samples: usize,
    pub test_samples: usize,
    /// Accuracy on the held-out partition, `None` when nothing was held out.
    pub accuracy: Option<f64>,
}

/// Train a classifier from `config.dataset_path` and save it to `config.model_path`.
///
/// # Errors
///
/// Returns a `PredictorError` if:
/// - `test_ratio` is outside `[0, 1)`,
/// - the dataset cannot be loaded,
/// - the training partition is empty,
/// - the model artifact cannot be written.
pub fn train(config: &TrainConfig) -> PredictorResult<TrainingReport> {
    if !(0.0..1.0).contains(&config.test_ratio) {
        return Err(PredictorError::InvalidInput(format!(
            "test ratio must be in [0, 1), got {}",
            config.test_ratio
        )));
    }

    let dataset = Dataset::load_csv(&config.dataset_path)?;
    tracing::info!(
        "loaded {} rows from {}",
        dataset.n_samples(),
        config.dataset_path.display()
    );

    train_on(&dataset, config, &config.model_path)
}

fn train_on(
    dataset: &Dataset,
    config: &TrainConfig,
    model_path: &Path,
) -> PredictorResult<TrainingReport> {
    let split = dataset.train_test_split(config.test_ratio, config.split_seed);

    let mut forest = RandomForest::new(config.forest);
    forest.fit(&split.train)?;

    let accuracy = if split.test.is_empty() {
        None
    } else {
        Some(forest.accuracy(&split.test)?)
    };

    ModelArtifact::new(forest, accuracy).save(model_path)?;
    tracing::info!("model saved as {}", model_path.display());

    Ok(TrainingReport {
        model_path: model_path.to_path_buf(),
        train_samples: split.train.n_samples(),
        test_samples: split.test.n_samples(),
        accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::SAMPLE_CSV;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> TrainConfig {
        let dataset_path = temp.path().join("diabetes.csv");
        std::fs::write(&dataset_path, SAMPLE_CSV).unwrap();
        let mut config = TrainConfig::new(dataset_path, temp.path().join("model.json"));
        config.forest.n_trees = 10;
        config
    }

    #[test]
    fn trains_and_writes_loadable_model() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);

        let report = train(&config).expect("training succeeds");
        assert_eq!(report.train_samples, 7);
        assert_eq!(report.test_samples, 3);
        let accuracy = report.accuracy.expect("held-out accuracy");
        assert!((0.0..=1.0).contains(&accuracy));

        let artifact = ModelArtifact::load(&report.model_path).expect("model loads");
        assert_eq!(artifact.forest.n_trees(), 10);
        assert_eq!(artifact.test_accuracy, report.accuracy);
    }

    #[test]
    fn zero_test_ratio_skips_accuracy() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.test_ratio = 0.0;

        let report = train(&config).unwrap();
        assert_eq!(report.test_samples, 0);
        assert_eq!(report.accuracy, None);
    }

    #[test]
    fn invalid_ratio_is_rejected_before_loading() {
        let temp = TempDir::new().unwrap();
        let mut config = TrainConfig::new(temp.path().join("missing.csv"), temp.path().join("m.json"));
        config.test_ratio = 1.0;
        assert!(matches!(train(&config), Err(PredictorError::InvalidInput(_))));
    }

    #[test]
    fn missing_dataset_fails() {
        let temp = TempDir::new().unwrap();
        let config = TrainConfig::new(temp.path().join("missing.csv"), temp.path().join("m.json"));
        assert!(matches!(train(&config), Err(PredictorError::FileRead { .. })));
        assert!(!temp.path().join("m.json").exists());
    }
}
