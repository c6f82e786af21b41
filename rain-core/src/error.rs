//! Error types for the rain predictor.
//!
//! Two families:
//! - [`EncodeError`]: request-level input problems, reported to the user and recovered from.
//! - [`ClassifierError`]: the model artifact could not be loaded, so no prediction can be served.

use std::path::PathBuf;

use thiserror::Error;

/// An observation could not be turned into a feature vector.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid date '{value}' in field Date: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Unknown compass direction '{label}'{}", in_field(.field))]
    UnknownDirection {
        field: Option<&'static str>,
        label: String,
    },

    #[error("Invalid value '{value}'{}: expected 'Yes' or 'No'", in_field(.field))]
    InvalidEnum {
        field: Option<&'static str>,
        value: String,
    },

    #[error("Expected {expected} features, but got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
}

impl EncodeError {
    /// Attach the name of the input field that produced this error.
    pub fn for_field(self, name: &'static str) -> Self {
        match self {
            EncodeError::UnknownDirection { label, .. } => EncodeError::UnknownDirection {
                field: Some(name),
                label,
            },
            EncodeError::InvalidEnum { value, .. } => EncodeError::InvalidEnum {
                field: Some(name),
                value,
            },
            other => other,
        }
    }

    /// Name of the offending input field, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            EncodeError::InvalidDate { .. } => Some("Date"),
            EncodeError::UnknownDirection { field, .. } | EncodeError::InvalidEnum { field, .. } => {
                *field
            }
            EncodeError::FeatureCountMismatch { .. } => None,
        }
    }
}

fn in_field(field: &Option<&'static str>) -> String {
    field.map(|f| format!(" in field {f}")).unwrap_or_default()
}

/// The classifier artifact is unavailable; the predictor cannot start.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(
        "Classifier unavailable: no model path configured.\n\
         Hint: run `rain configure --model <path>` or pass `--model <path>`."
    )]
    NotConfigured,

    #[error("Classifier unavailable: model file not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Classifier unavailable: failed to read model file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Classifier unavailable: failed to parse model file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Classifier unavailable: incompatible model {}: {reason}", .path.display())]
    Incompatible { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_field_names_the_field_in_the_message() {
        let err = EncodeError::InvalidEnum {
            field: None,
            value: "yes".into(),
        }
        .for_field("RainToday");

        assert_eq!(err.field(), Some("RainToday"));
        assert_eq!(
            err.to_string(),
            "Invalid value 'yes' in field RainToday: expected 'Yes' or 'No'"
        );
    }

    #[test]
    fn message_without_field_omits_it() {
        let err = EncodeError::UnknownDirection {
            field: None,
            label: "X".into(),
        };
        assert_eq!(err.to_string(), "Unknown compass direction 'X'");
        assert_eq!(err.field(), None);
    }

    #[test]
    fn for_field_keeps_count_mismatch_unchanged() {
        let err = EncodeError::FeatureCountMismatch {
            expected: 28,
            actual: 27,
        }
        .for_field("Date");
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "Expected 28 features, but got 27");
    }

    #[test]
    fn not_configured_carries_hint() {
        let msg = ClassifierError::NotConfigured.to_string();
        assert!(msg.starts_with("Classifier unavailable"));
        assert!(msg.contains("Hint: run `rain configure"));
    }
}
