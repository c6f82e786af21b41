//! Core library for the `rain` CLI.
//!
//! This crate defines:
//! - The feature encoder that turns one day's observations into the model's input vector
//! - The classifier boundary and the on-disk model loader
//! - Configuration and optional asset handling
//!
//! It is used by `rain-cli`, but can also be embedded in other front-ends or services.

pub mod assets;
pub mod classifier;
pub mod compass;
pub mod config;
pub mod encoder;
pub mod error;
pub mod model;
pub mod service;

pub use classifier::{Classifier, ForestClassifier};
pub use compass::CompassPoint;
pub use config::Config;
pub use encoder::{FEATURE_COUNT, FEATURE_LAYOUT, build_feature_vector};
pub use error::{ClassifierError, EncodeError};
pub use model::{FeatureVector, Measurements, Prediction, RawObservation};
pub use service::RainPredictor;
