//! Stockout alerting against a pre-trained classifier artifact.
//!
//! The classifier is an ensemble of decision trees serialized as JSON. It is
//! deserialized once from a configured path and then shared read-only for the
//! process lifetime; there is no retrain or reload path. Feature values are
//! scored as-is, with no validation against the training distribution.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ServiceError;

/// Number of input features: temperature, fuel price, CPI, unemployment rate.
pub const N_FEATURES: usize = 4;

/// Message returned when the classifier predicts class 1.
pub const STOCKOUT_ALERT: &str = "⚠️ ALERT: Likely stockout!";

/// Message returned when the classifier predicts class 0.
pub const ALL_CLEAR: &str = "✅ All Good";

/// A node of a serialized decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Node(Box<SplitNode>),
    Leaf(LeafNode),
}

/// Internal split: `feature <= threshold` descends left, otherwise right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitNode {
    pub feature_idx: usize,
    pub threshold: f64,
    pub left: TreeNode,
    pub right: TreeNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafNode {
    pub class_label: usize,
}

impl TreeNode {
    /// Walk the tree for a single feature vector.
    fn predict_one(&self, features: &[f64; N_FEATURES]) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(split) => {
                    node = if features[split.feature_idx] <= split.threshold {
                        &split.left
                    } else {
                        &split.right
                    };
                }
            }
        }
    }
}

/// Pre-trained stockout classifier: majority vote over the tree ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockoutClassifier {
    trees: Vec<TreeNode>,
}

impl StockoutClassifier {
    /// Deserialize the classifier from its JSON artifact.
    ///
    /// # Errors
    ///
    /// `ArtifactError` if the file is missing, unreadable, or not a valid
    /// serialized ensemble.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let raw = std::fs::read(path).map_err(|e| {
            ServiceError::ArtifactError(format!(
                "classifier artifact {} is not readable: {}",
                path.display(),
                e
            ))
        })?;
        let classifier: StockoutClassifier = serde_json::from_slice(&raw).map_err(|e| {
            ServiceError::ArtifactError(format!(
                "classifier artifact {} is not a valid model: {}",
                path.display(),
                e
            ))
        })?;
        info!(
            artifact = %path.display(),
            trees = classifier.trees.len(),
            "loaded stockout classifier"
        );
        Ok(classifier)
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Predicted class for a feature vector, by majority vote across trees.
    /// A pure function of the input given a fixed artifact.
    pub fn predict(&self, features: &[f64; N_FEATURES]) -> usize {
        let alerts = self
            .trees
            .iter()
            .filter(|tree| tree.predict_one(features) == 1)
            .count();
        usize::from(alerts * 2 > self.trees.len())
    }
}

/// Process-wide handle to the classifier: remembers the artifact path and
/// loads the model at most once, on first use. Once loaded the model is
/// immutable for the process lifetime.
#[derive(Debug)]
pub struct StockoutModel {
    path: PathBuf,
    classifier: OnceCell<StockoutClassifier>,
}

impl StockoutModel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            classifier: OnceCell::new(),
        }
    }

    /// Path of the backing artifact.
    pub fn artifact_path(&self) -> &Path {
        &self.path
    }

    /// The loaded classifier, loading it on first call.
    pub fn classifier(&self) -> Result<&StockoutClassifier, ServiceError> {
        self.classifier
            .get_or_try_init(|| StockoutClassifier::load(&self.path))
    }

    /// Whether the classifier has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.classifier.get().is_some()
    }

    /// Score a feature vector and map the predicted class to the fixed
    /// alert / all-clear message.
    pub fn check_stockout(
        &self,
        temperature: f64,
        fuel_price: f64,
        cpi: f64,
        unemployment_rate: f64,
    ) -> Result<&'static str, ServiceError> {
        let features = [temperature, fuel_price, cpi, unemployment_rate];
        let class = self.classifier()?.predict(&features);
        Ok(if class == 1 { STOCKOUT_ALERT } else { ALL_CLEAR })
    }
}
