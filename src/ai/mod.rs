//! Sentence classifiers backed by a local Ollama server.
//!
//! # Module Structure
//!
//! - `ollama`: HTTP client and the [`OllamaClassifier`] adapter
//! - `prompts`: classification prompts
//!
//! # Example
//!
//! ```no_run
//! use quill::ai::OllamaClassifier;
//! use quill::mood::EmotionClassifier;
//!
//! let classifier = OllamaClassifier::load("http://127.0.0.1:11434", "llama3.2:3b")?;
//! let label = classifier.predict_label("I can't stop smiling today.")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ollama;
pub mod prompts;

// Re-export commonly used types
pub use ollama::{Message, OllamaClassifier, OllamaClient};

use crate::config::Config;
use crate::mood::{EmotionClassifier, ModelSlot, MoodScorer, SentimentClassifier};

/// Loads both classifiers named in the configuration.
///
/// A model that fails to load leaves the scorer unavailable; this never fails.
pub fn load_scorer(config: &Config) -> MoodScorer {
    let emotion = OllamaClassifier::load(&config.ollama_url, &config.emotion_model)
        .map(|c| Box::new(c) as Box<dyn EmotionClassifier>);
    let sentiment = OllamaClassifier::load(&config.ollama_url, &config.sentiment_model)
        .map(|c| Box::new(c) as Box<dyn SentimentClassifier>);

    MoodScorer::new(
        ModelSlot::from_load(&config.emotion_model, emotion),
        ModelSlot::from_load(&config.sentiment_model, sentiment),
    )
}
