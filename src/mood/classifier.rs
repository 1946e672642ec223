//! Sentence classifier collaborators.
//!
//! Two models feed the mood pipeline: a binary "is this sentence emotional"
//! classifier and a multi-class polarity classifier. Either may fail to load;
//! a [`ModelSlot`] remembers why, so scoring can answer "unavailable" instead of
//! aborting.

use crate::errors::ClassifierError;
use std::collections::HashMap;
use tracing::warn;

/// Binary emotionality classifier. Answers `"Yes"` or `"No"`.
pub trait EmotionClassifier: Send + Sync {
    fn predict_label(&self, text: &str) -> Result<String, ClassifierError>;
}

/// Polarity classifier. Returns up to `k` labels with their probabilities,
/// including at least `positive` and `negative`.
pub trait SentimentClassifier: Send + Sync {
    fn predict_top_labels(
        &self,
        text: &str,
        k: usize,
    ) -> Result<HashMap<String, f64>, ClassifierError>;
}

/// A classifier that either loaded or failed to.
pub enum ModelSlot<T: ?Sized> {
    Loaded(Box<T>),
    Missing { model: String, reason: String },
}

impl<T: ?Sized> ModelSlot<T> {
    /// Wraps the outcome of loading a model, logging a failure.
    pub fn from_load(model: &str, loaded: Result<Box<T>, ClassifierError>) -> Self {
        match loaded {
            Ok(classifier) => ModelSlot::Loaded(classifier),
            Err(err) => {
                warn!("Classifier '{}' failed to load: {}", model, err);
                ModelSlot::Missing {
                    model: model.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelSlot::Loaded(_))
    }

    /// Borrows the classifier or reports it as unavailable.
    pub fn get(&self) -> Result<&T, ClassifierError> {
        match self {
            ModelSlot::Loaded(classifier) => Ok(classifier.as_ref()),
            ModelSlot::Missing { model, reason } => Err(ClassifierError::Unavailable {
                model: model.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Looks a label up ignoring ASCII case. Missing labels have probability 0.
pub(crate) fn label_probability(labels: &HashMap<String, f64>, label: &str) -> f64 {
    labels
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, probability)| *probability)
        .unwrap_or(0.0)
}
