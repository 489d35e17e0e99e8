//! Random forest of gini decision trees.

use super::tree::{DecisionTree, TreeConfig};
use crate::constants::{DEFAULT_TREE_COUNT, FEATURE_COUNT};
use crate::dataset::Dataset;
use crate::{PredictorError, PredictorResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random forest configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (sqrt of total if None)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREE_COUNT,
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Train the forest. Trees are grown in parallel, each from its own seeded RNG, so the
    /// result depends only on the dataset and `config.seed`.
    pub fn fit(&mut self, dataset: &Dataset) -> PredictorResult<()> {
        if dataset.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }

        let n = dataset.n_samples();
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (FEATURE_COUNT as f64).sqrt().ceil() as usize);
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(max_features),
        };
        let config = self.config;

        self.trees = (0..config.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let indices: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };

                let mut tree = DecisionTree::new(tree_config);
                tree.fit(dataset, &indices, &mut rng);
                tree
            })
            .collect();

        tracing::debug!("fitted {} trees on {} samples", self.trees.len(), n);
        Ok(())
    }

    /// Check every tree's structure, so a corrupt model fails at load rather than at predict.
    pub fn validate(&self) -> PredictorResult<()> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| match e {
                PredictorError::CorruptModel(msg) => {
                    PredictorError::CorruptModel(format!("tree {i}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Mean diabetic probability across trees.
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> PredictorResult<f64> {
        let probs: Vec<f64> = self
            .trees
            .iter()
            .filter_map(|t| t.predict_proba(features))
            .collect();
        if probs.is_empty() {
            return Err(PredictorError::UnfittedModel);
        }
        Ok(probs.iter().sum::<f64>() / probs.len() as f64)
    }

    /// Predicted label: 1 when the mean probability exceeds one half.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> PredictorResult<u8> {
        Ok(u8::from(self.predict_proba(features)? > 0.5))
    }

    /// Fraction of rows in `dataset` predicted correctly.
    pub fn accuracy(&self, dataset: &Dataset) -> PredictorResult<f64> {
        if dataset.is_empty() {
            return Err(PredictorError::EmptyDataset);
        }
        let mut correct = 0usize;
        for (features, &label) in dataset.features.iter().zip(&dataset.labels) {
            if self.predict(features)? == label {
                correct += 1;
            }
        }
        Ok(correct as f64 / dataset.n_samples() as f64)
    }
}
