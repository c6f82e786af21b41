use std::{fmt::Debug, fs, path::Path};

use serde::Deserialize;

use crate::{
    encoder::{FEATURE_COUNT, FEATURE_LAYOUT},
    error::ClassifierError,
    model::{FeatureVector, Prediction},
};

/// A trained next-day-rain model. Read-only once loaded.
pub trait Classifier: Send + Sync + Debug {
    fn predict(&self, features: &FeatureVector) -> Prediction;
}

/// Artifact format versions this build understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Random forest exported as JSON decision trees.
///
/// Splits go left when `x[feature] <= threshold`; leaves hold per-class
/// weights `[no_rain, rain]`. Tree probabilities are averaged.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    trees: Vec<Tree>,
}

#[derive(Debug, Deserialize)]
struct ForestArtifact {
    format_version: u32,
    n_features: usize,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
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
        value: Vec<f64>,
    },
}

impl ForestClassifier {
    /// Load and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::Missing {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|source| ClassifierError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact: ForestArtifact =
            serde_json::from_str(&contents).map_err(|source| ClassifierError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let forest = Self::from_artifact(artifact).map_err(|reason| {
            ClassifierError::Incompatible {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        tracing::info!(
            "Loaded classifier from {} ({} trees)",
            path.display(),
            forest.trees.len()
        );
        Ok(forest)
    }

    fn from_artifact(artifact: ForestArtifact) -> Result<Self, String> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (expected {SUPPORTED_FORMAT_VERSION})",
                artifact.format_version
            ));
        }
        if artifact.n_features != FEATURE_COUNT {
            return Err(format!(
                "model expects {} features, encoder produces {FEATURE_COUNT}",
                artifact.n_features
            ));
        }
        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_LAYOUT.iter().copied()) {
                return Err("feature names do not match the encoder layout".to_string());
            }
        }
        if artifact.trees.is_empty() {
            return Err("model contains no trees".to_string());
        }
        for (i, tree) in artifact.trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }

        Ok(Self {
            trees: artifact.trees,
        })
    }

    /// Mean probability of rain across all trees.
    pub fn rain_probability(&self, features: &FeatureVector) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.rain_probability(features)).sum();
        total / self.trees.len() as f64
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Prediction {
        // Ties go to class 0, matching argmax over [no_rain, rain].
        if self.rain_probability(features) > 0.5 {
            Prediction::Rain
        } else {
            Prediction::NoRain
        }
    }
}

impl Tree {
    /// Children must point forward, so traversal always terminates.
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }

        let len = self.nodes.len();
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(format!("node {id}: feature index {feature} out of range"));
                    }
                    for child in [left, right] {
                        if *child <= id || *child >= len {
                            return Err(format!("node {id}: invalid child index {child}"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    let valid = value.len() == 2
                        && value.iter().all(|w| w.is_finite() && *w >= 0.0)
                        && total.is_finite()
                        && total > 0.0;
                    if !valid {
                        return Err(format!(
                            "node {id}: leaf must hold two non-negative class weights"
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn rain_probability(&self, features: &FeatureVector) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).unwrap_or(f64::NAN);
                    // NaN compares false and goes right.
                    id = if x <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value[1] / (value[0] + value[1]),
            }
        }
    }
}

/// Load the classifier named by `path`, or fail if none is configured.
pub fn classifier_from_path(
    path: Option<&Path>,
) -> Result<Box<dyn Classifier>, ClassifierError> {
    let path = path.ok_or(ClassifierError::NotConfigured)?;
    let forest = ForestClassifier::load(path)?;
    Ok(Box::new(forest))
}
