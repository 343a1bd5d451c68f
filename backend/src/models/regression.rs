//! Regression model used to score feature vectors
//!
//! The trained model is exported to JSON by the training notebook. Two
//! layouts are supported: a plain linear model and a tree ensemble (random
//! forest averages its trees, gradient boosting sums them). Both are
//! consumed through the [`Regressor`] trait so the prediction service does
//! not care which one is deployed.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;

use shared::{FeatureVector, PredictionResult, FEATURE_COUNT, FEATURE_NAMES};

use crate::error::{AppError, AppResult};

/// Scalar regression capability
pub trait Regressor: Send + Sync {
    /// Score one feature row
    fn predict(&self, features: &[f64]) -> AppResult<f64>;

    /// Model name for logs
    fn name(&self) -> &str;
}

/// Serialized model document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting
    #[default]
    Sum,
    /// Random forest
    Mean,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<RegressionTree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

/// Tree node; the root is `nodes[0]`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    /// Samples with `x[feature] <= threshold` go left, everything else
    /// (including NaN) goes right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

impl ModelArtifact {
    /// Parse and structurally check a model document
    pub fn from_json(json: &str) -> AppResult<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| AppError::ModelLoad(format!("invalid model document: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            ModelArtifact::Linear(m) => m.feature_names.as_deref(),
            ModelArtifact::TreeEnsemble(m) => m.feature_names.as_deref(),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(names) = self.feature_names() {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(AppError::ModelLoad(format!(
                    "feature order {:?} does not match expected {:?}",
                    names, FEATURE_NAMES
                )));
            }
        }

        if let ModelArtifact::TreeEnsemble(ensemble) = self {
            if ensemble.trees.is_empty() {
                return Err(AppError::ModelLoad("tree ensemble has no trees".to_string()));
            }
            for (i, tree) in ensemble.trees.iter().enumerate() {
                tree.validate()
                    .map_err(|msg| AppError::ModelLoad(format!("tree {}: {}", i, msg)))?;
            }
        }

        Ok(())
    }
}

impl RegressionTree {
    /// Children must point forward, which also rules out cycles
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = *node {
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", idx, child));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, features: &[f64]) -> AppResult<f64> {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { leaf } => return Ok(leaf),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(feature).copied().ok_or_else(|| {
                        AppError::ModelInference(format!(
                            "split on feature {} but only {} features given",
                            feature,
                            features.len()
                        ))
                    })?;
                    idx = if value <= threshold { left } else { right };
                }
            }
        }
    }
}

fn check_dimension(expected: usize, features: &[f64]) -> AppResult<()> {
    if expected != features.len() {
        return Err(AppError::ModelInference(format!(
            "expected {} features, got {}",
            expected,
            features.len()
        )));
    }
    Ok(())
}

impl Regressor for LinearModel {
    fn predict(&self, features: &[f64]) -> AppResult<f64> {
        check_dimension(self.coefficients.len(), features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn name(&self) -> &str {
        "linear"
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, features: &[f64]) -> AppResult<f64> {
        // feature_names, when present, already equals the fixed order
        check_dimension(FEATURE_COUNT, features)?;

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        let combined = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean => total / self.trees.len() as f64,
        };
        Ok(self.base_score + combined)
    }

    fn name(&self) -> &str {
        match self.aggregation {
            Aggregation::Sum => "gradient_boosting",
            Aggregation::Mean => "random_forest",
        }
    }
}

impl ModelArtifact {
    pub fn into_regressor(self) -> Arc<dyn Regressor> {
        match self {
            ModelArtifact::Linear(m) => Arc::new(m),
            ModelArtifact::TreeEnsemble(m) => Arc::new(m),
        }
    }
}

/// Read and parse a model file
pub async fn load_model(path: impl AsRef<Path>) -> AppResult<Arc<dyn Regressor>> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::ModelLoad(format!("model file not found: {}", path.display()))
        } else {
            AppError::ModelLoad(format!("cannot read {}: {}", path.display(), e))
        }
    })?;

    let regressor = ModelArtifact::from_json(&json)?.into_regressor();
    tracing::info!(path = %path.display(), model = regressor.name(), "Model loaded");
    Ok(regressor)
}

/// Score a feature vector and classify the result
pub fn predict_trash(model: &dyn Regressor, features: &FeatureVector) -> AppResult<PredictionResult> {
    let values = features.to_array();
    tracing::debug!(?values, "Scoring feature vector");

    let amount = model.predict(&values)?;
    if !amount.is_finite() {
        return Err(AppError::ModelInference(format!(
            "{} produced a non-finite value",
            model.name()
        )));
    }

    Ok(PredictionResult::from_amount(amount))
}

/// Process-wide model handle, loaded on first use and kept for the
/// lifetime of the process
pub struct ModelStore {
    path: Option<String>,
    model: OnceCell<Arc<dyn Regressor>>,
}

impl ModelStore {
    /// Lazily load the model from `path` on first use
    pub fn new(path: Option<String>) -> Self {
        Self {
            path,
            model: OnceCell::new(),
        }
    }

    /// Use an already constructed model
    pub fn preloaded(model: Arc<dyn Regressor>) -> Self {
        Self {
            path: None,
            model: OnceCell::new_with(Some(model)),
        }
    }

    pub async fn get(&self) -> AppResult<Arc<dyn Regressor>> {
        self.model
            .get_or_try_init(|| async {
                let path = self
                    .path
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| {
                        AppError::Configuration("Model path is not configured".to_string())
                    })?;
                load_model(path).await
            })
            .await
            .cloned()
    }

    pub async fn predict(&self, features: &FeatureVector) -> AppResult<PredictionResult> {
        let model = self.get().await?;
        predict_trash(model.as_ref(), features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ObservationSample;
    use std::io::Write;

    const FORWARD_TREE: &str = r#"{
        "kind": "tree_ensemble",
        "aggregation": "mean",
        "base_score": 0.0,
        "trees": [
            {"nodes": [
                {"feature": 4, "threshold": 20.0, "left": 1, "right": 2},
                {"leaf": 50.0},
                {"leaf": 350.0}
            ]},
            {"nodes": [
                {"feature": 0, "threshold": 180.0, "left": 1, "right": 2},
                {"leaf": 150.0},
                {"leaf": 250.0}
            ]}
        ]
    }"#;

    fn sample_features(current_speed: f64) -> FeatureVector {
        let date = chrono::NaiveDate::from_ymd_opt(2016, 1, 5)
            .unwrap()
            .and_hms_opt(15, 20, 0)
            .unwrap();
        FeatureVector::build(
            &date,
            &ObservationSample::new(45.0, current_speed),
            &ObservationSample::new(270.0, 6.0),
        )
    }

    #[test]
    fn test_linear_model_predicts() {
        let json = r#"{"kind": "linear", "intercept": 10.0,
                       "coefficients": [1, 0, 0, 0, 2, 0, 0, 0, 0]}"#;
        let model = ModelArtifact::from_json(json).unwrap().into_regressor();
        let fv = sample_features(30.0);
        // 10 + 5 (day of year) + 2 * 30
        let result = predict_trash(model.as_ref(), &fv).unwrap();
        assert!((result.trash_amount - 75.0).abs() < 1e-9);
        assert_eq!(result.status, shared::TrashStatus::Low);
    }

    #[test]
    fn test_linear_dimension_mismatch_is_inference_error() {
        let json = r#"{"kind": "linear", "intercept": 0.0, "coefficients": [1, 2, 3]}"#;
        let model = ModelArtifact::from_json(json).unwrap().into_regressor();
        let err = predict_trash(model.as_ref(), &sample_features(1.0)).unwrap_err();
        assert!(matches!(err, AppError::ModelInference(_)));
    }

    #[test]
    fn test_tree_ensemble_mean() {
        let model = ModelArtifact::from_json(FORWARD_TREE).unwrap().into_regressor();
        assert_eq!(model.name(), "random_forest");

        // slow current, early in the year: (50 + 150) / 2
        let low = predict_trash(model.as_ref(), &sample_features(10.0)).unwrap();
        assert!((low.trash_amount - 100.0).abs() < 1e-9);
        assert_eq!(low.status, shared::TrashStatus::Medium);

        // fast current: (350 + 150) / 2
        let high = predict_trash(model.as_ref(), &sample_features(40.0)).unwrap();
        assert!((high.trash_amount - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_tree_dimension_mismatch_without_feature_names() {
        let model = ModelArtifact::from_json(FORWARD_TREE).unwrap().into_regressor();
        for len in [1, 8, 12] {
            let err = model.predict(&vec![0.0; len]).unwrap_err();
            assert!(matches!(err, AppError::ModelInference(_)), "len {}", len);
        }
        assert!(model.predict(&[0.0; FEATURE_COUNT]).is_ok());
    }

    #[test]
    fn test_nan_goes_right() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { leaf: -1.0 },
                TreeNode::Leaf { leaf: 1.0 },
            ],
        };
        assert_eq!(tree.evaluate(&[f64::NAN]).unwrap(), 1.0);
        assert_eq!(tree.evaluate(&[0.5]).unwrap(), -1.0);
    }

    #[test]
    fn test_backward_child_rejected() {
        let json = r#"{"kind": "tree_ensemble", "trees": [{"nodes": [
            {"feature": 0, "threshold": 1.0, "left": 0, "right": 1},
            {"leaf": 1.0}
        ]}]}"#;
        assert!(matches!(
            ModelArtifact::from_json(json),
            Err(AppError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_feature_order_mismatch_rejected() {
        let json = r#"{"kind": "linear", "intercept": 0.0,
            "feature_names": ["day_sin", "dayofyear", "day_cos", "wind_speed",
                              "current_speed", "wind_u", "wind_v", "current_u", "current_v"],
            "coefficients": [0, 0, 0, 0, 0, 0, 0, 0, 0]}"#;
        assert!(matches!(
            ModelArtifact::from_json(json),
            Err(AppError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = ModelArtifact::from_json(r#"{"kind": "svm"}"#).unwrap_err();
        assert!(matches!(err, AppError::ModelLoad(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let store = ModelStore::new(Some("/nonexistent/trash_model.json".to_string()));
        let err = store.predict(&sample_features(1.0)).await.unwrap_err();
        assert!(matches!(err, AppError::ModelLoad(msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_unset_path_is_configuration_error() {
        let store = ModelStore::new(None);
        assert!(matches!(
            store.get().await,
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_store_loads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FORWARD_TREE.as_bytes()).unwrap();
        let store = ModelStore::new(Some(file.path().to_string_lossy().into_owned()));

        let first = store.get().await.unwrap();
        // later reads come from the cache even if the file disappears
        let path = file.into_temp_path();
        path.close().unwrap();
        let second = store.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
