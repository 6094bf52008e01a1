use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::application::FEATURE_COUNT;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed model file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// A pre-trained binary approval classifier.
pub trait LoanClassifier {
    /// `true` means approve.
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> bool;
}

impl<T: LoanClassifier + ?Sized> LoanClassifier for &T {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> bool {
        (**self).predict(features)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, x: &[f64; FEATURE_COUNT]) -> u8 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { class } => return *class,
                Node::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Decision-tree ensemble exported to JSON.
///
/// ```json
/// {"n_features": 8, "trees": [{"nodes": [
///     {"feature": 2, "threshold": 7.5, "left": 1, "right": 2},
///     {"class": 0},
///     {"class": 1}
/// ]}]}
/// ```
///
/// A split sends a sample left when `x[feature] <= threshold`. The forest
/// predicts the majority class; a tied vote predicts 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawForest")]
pub struct RandomForestModel {
    n_features: usize,
    trees: Vec<Tree>,
}

/// Unchecked on-disk shape; only reachable through `RandomForestModel`'s
/// validating conversion.
#[derive(Deserialize)]
struct RawForest {
    n_features: usize,
    trees: Vec<Tree>,
}

impl TryFrom<RawForest> for RandomForestModel {
    type Error = ModelError;

    fn try_from(raw: RawForest) -> Result<Self, Self::Error> {
        let model = RandomForestModel { n_features: raw.n_features, trees: raw.trees };
        model.validate()?;
        Ok(model)
    }
}

impl RandomForestModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        let model = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), trees = model.trees.len(), "loan model loaded");
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let raw: RawForest = serde_json::from_str(json)?;
        RandomForestModel::try_from(raw)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Every tree must terminate inside bounds: children point forward, split
    /// features exist and leaves are 0 or 1.
    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "expected {FEATURE_COUNT} features, model has {}",
                self.n_features
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Invalid(format!("tree {t} has no nodes")));
            }
            let len = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Leaf { class } if *class > 1 => {
                        return Err(ModelError::Invalid(format!(
                            "tree {t} node {i}: class {class} is not binary"
                        )));
                    }
                    Node::Leaf { .. } => {}
                    Node::Split { feature, threshold, left, right } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {i}: feature {feature} out of range"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {i}: threshold is not finite"
                            )));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= len {
                                return Err(ModelError::Invalid(format!(
                                    "tree {t} node {i}: child {child} is not a later node"
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl LoanClassifier for RandomForestModel {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> bool {
        let approvals = self.trees.iter().filter(|t| t.predict(features) == 1).count();
        approvals * 2 > self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One stump per rule: CGPA > 7.5, student score > 650, assets > 1e6.
    const FOREST: &str = r#"{
        "n_features": 8,
        "trees": [
            {"nodes": [{"feature": 2, "threshold": 7.5, "left": 1, "right": 2}, {"class": 0}, {"class": 1}]},
            {"nodes": [{"feature": 4, "threshold": 650, "left": 1, "right": 2}, {"class": 0}, {"class": 1}]},
            {"nodes": [{"feature": 5, "threshold": 1000000, "left": 1, "right": 2}, {"class": 0}, {"class": 1}]}
        ]
    }"#;

    fn features(cgpa: f64, student_score: f64, assets: f64) -> [f64; FEATURE_COUNT] {
        [90.0, 90.0, cgpa, 750.0, student_score, assets, 0.0, 100.0]
    }

    #[test]
    fn majority_vote() {
        let m = RandomForestModel::from_json(FOREST).unwrap();
        assert_eq!(m.tree_count(), 3);
        assert!(m.predict(&features(9.0, 700.0, 0.0)));
        assert!(m.predict(&features(9.0, 700.0, 2_000_000.0)));
        assert!(!m.predict(&features(9.0, 600.0, 0.0)));
        assert!(!m.predict(&features(6.0, 600.0, 0.0)));
    }

    #[test]
    fn threshold_goes_left_when_equal() {
        let m = RandomForestModel::from_json(FOREST).unwrap();
        assert!(!m.predict(&features(7.5, 650.0, 2_000_000.0)));
    }

    #[test]
    fn tie_predicts_rejection() {
        let json = r#"{"n_features": 8, "trees": [{"nodes": [{"class": 1}]}, {"nodes": [{"class": 0}]}]}"#;
        let m = RandomForestModel::from_json(json).unwrap();
        assert!(!m.predict(&[0.0; FEATURE_COUNT]));
    }

    #[test]
    fn deeper_tree_is_walked() {
        let json = r#"{"n_features": 8, "trees": [{"nodes": [
            {"feature": 2, "threshold": 8.0, "left": 1, "right": 2},
            {"class": 0},
            {"feature": 7, "threshold": 5000, "left": 3, "right": 4},
            {"class": 1},
            {"class": 0}
        ]}]}"#;
        let m = RandomForestModel::from_json(json).unwrap();
        let mut x = [0.0; FEATURE_COUNT];
        x[2] = 9.0;
        x[7] = 1200.0;
        assert!(m.predict(&x));
        x[7] = 9000.0;
        assert!(!m.predict(&x));
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let json = r#"{"n_features": 7, "trees": [{"nodes": [{"class": 1}]}]}"#;
        assert!(matches!(RandomForestModel::from_json(json), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn rejects_backward_child_and_bad_feature() {
        let cycle = r#"{"n_features": 8, "trees": [{"nodes": [{"feature": 0, "threshold": 1, "left": 0, "right": 1}, {"class": 1}]}]}"#;
        assert!(matches!(RandomForestModel::from_json(cycle), Err(ModelError::Invalid(_))));

        let feature = r#"{"n_features": 8, "trees": [{"nodes": [{"feature": 8, "threshold": 1, "left": 1, "right": 2}, {"class": 1}, {"class": 0}]}]}"#;
        assert!(matches!(RandomForestModel::from_json(feature), Err(ModelError::Invalid(_))));

        let class = r#"{"n_features": 8, "trees": [{"nodes": [{"class": 2}]}]}"#;
        assert!(matches!(RandomForestModel::from_json(class), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_forest_and_garbage() {
        assert!(matches!(
            RandomForestModel::from_json(r#"{"n_features": 8, "trees": []}"#),
            Err(ModelError::Invalid(_))
        ));
        assert!(matches!(RandomForestModel::from_json("not json"), Err(ModelError::Json(_))));
    }

    #[test]
    fn serde_deserialization_also_validates() {
        let bad = r#"{"n_features": 8, "trees": [{"nodes": [{"feature": 99, "threshold": 1, "left": 1, "right": 2}, {"class": 1}, {"class": 0}]}]}"#;
        let err = serde_json::from_str::<RandomForestModel>(bad).unwrap_err();
        assert!(err.to_string().contains("feature 99 out of range"));

        let nested: Vec<RandomForestModel> = serde_json::from_str(&format!("[{FOREST}]")).unwrap();
        assert_eq!(nested[0].tree_count(), 3);
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, FOREST).unwrap();
        assert_eq!(RandomForestModel::load(&path).unwrap().tree_count(), 3);

        let missing = RandomForestModel::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ModelError::Io(_))));
    }
}
