use std::path::Path;

use crate::{
    classifier::{Classifier, classifier_from_path},
    encoder::build_feature_vector,
    error::{ClassifierError, EncodeError},
    model::{Prediction, RawObservation},
};

/// Serves one prediction per submitted observation.
///
/// Holds only the loaded classifier, so a single instance can answer
/// requests from several threads.
#[derive(Debug)]
pub struct RainPredictor {
    classifier: Box<dyn Classifier>,
}

impl RainPredictor {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Load the classifier at startup. Fails if no usable model is available.
    pub fn from_model_path(path: Option<&Path>) -> Result<Self, ClassifierError> {
        classifier_from_path(path).map(Self::new)
    }

    pub fn handle(&self, raw: &RawObservation) -> Result<Prediction, EncodeError> {
        let features = build_feature_vector(raw)?;
        tracing::debug!(?features, "Encoded observation for {}", raw.date);

        let prediction = self.classifier.predict(&features);
        tracing::debug!(?prediction, "Prediction for {}", raw.date);
        Ok(prediction)
    }
}
