//! Gini decision tree for binary classification.

use crate::constants::FEATURE_COUNT;
use crate::dataset::Dataset;
use crate::{PredictorError, PredictorResult};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree growth limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Features considered at each split (None = all)
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// Fraction of training samples in this leaf labelled diabetic.
        positive_rate: f64,
        n_samples: usize,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Check that every split indexes a real feature and every number is usable.
    pub fn validate(&self) -> PredictorResult<()> {
        match self {
            TreeNode::Leaf { positive_rate, .. } => {
                if !(0.0..=1.0).contains(positive_rate) {
                    return Err(PredictorError::CorruptModel(format!(
                        "leaf positive rate {positive_rate} outside [0, 1]"
                    )));
                }
                Ok(())
            }
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if *feature_idx >= FEATURE_COUNT {
                    return Err(PredictorError::CorruptModel(format!(
                        "split on feature {feature_idx}, only {FEATURE_COUNT} exist"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(PredictorError::CorruptModel(format!(
                        "split threshold {threshold} is not finite"
                    )));
                }
                left.validate()?;
                right.validate()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
}

struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn validate(&self) -> PredictorResult<()> {
        self.root.as_ref().map_or(Ok(()), TreeNode::validate)
    }

    /// Grow the tree on the rows of `dataset` selected by `indices` (duplicates allowed).
    pub fn fit(&mut self, dataset: &Dataset, indices: &[usize], rng: &mut ChaCha8Rng) {
        self.root = if indices.is_empty() {
            None
        } else {
            Some(self.build(dataset, indices, 0, rng))
        };
    }

    /// Probability that `features` is diabetic, or `None` if the tree was never fitted.
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Option<f64> {
        let mut node = self.root.as_ref()?;
        loop {
            match node {
                TreeNode::Leaf { positive_rate, .. } => return Some(*positive_rate),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn build(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let positives = count_positive(dataset, indices);
        let impurity = gini(positives, n);

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || impurity < 1e-10
        {
            return leaf(positives, n);
        }

        match self.find_best_split(dataset, indices, impurity, rng) {
            Some(split) => TreeNode::Split {
                feature_idx: split.feature_idx,
                threshold: split.threshold,
                left: Box::new(self.build(dataset, &split.left, depth + 1, rng)),
                right: Box::new(self.build(dataset, &split.right, depth + 1, rng)),
            },
            None => leaf(positives, n),
        }
    }

    fn find_best_split(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<BestSplit> {
        let n = indices.len();
        let total_pos = count_positive(dataset, indices);

        let mut candidates: Vec<usize> = (0..FEATURE_COUNT).collect();
        candidates.shuffle(rng);
        let n_candidates = self
            .config
            .max_features
            .unwrap_or(FEATURE_COUNT)
            .clamp(1, FEATURE_COUNT);

        let mut best: Option<(f64, usize, f64)> = None;
        let mut sorted = indices.to_vec();

        for &feature_idx in &candidates[..n_candidates] {
            sorted.sort_by(|&a, &b| {
                dataset.features[a][feature_idx].total_cmp(&dataset.features[b][feature_idx])
            });

            let mut left_pos = 0usize;
            for i in 0..n - 1 {
                left_pos += usize::from(dataset.labels[sorted[i]]);
                let here = dataset.features[sorted[i]][feature_idx];
                let next = dataset.features[sorted[i + 1]][feature_idx];
                if here == next {
                    continue;
                }

                let left_n = i + 1;
                let right_n = n - left_n;
                if left_n < self.config.min_samples_leaf || right_n < self.config.min_samples_leaf
                {
                    continue;
                }

                let weighted = (left_n as f64 * gini(left_pos, left_n)
                    + right_n as f64 * gini(total_pos - left_pos, right_n))
                    / n as f64;
                let gain = parent_impurity - weighted;

                if gain > 1e-12 && best.map_or(true, |(g, _, _)| gain > g) {
                    best = Some((gain, feature_idx, (here + next) / 2.0));
                }
            }
        }

        let (_, feature_idx, threshold) = best?;
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| dataset.features[i][feature_idx] <= threshold);

        Some(BestSplit {
            feature_idx,
            threshold,
            left,
            right,
        })
    }
}

fn leaf(positives: usize, n: usize) -> TreeNode {
    TreeNode::Leaf {
        positive_rate: positives as f64 / n as f64,
        n_samples: n,
    }
}

fn count_positive(dataset: &Dataset, indices: &[usize]) -> usize {
    indices
        .iter()
        .map(|&i| usize::from(dataset.labels[i]))
        .sum()
}

/// Gini impurity of a binary node.
fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
