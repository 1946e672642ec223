//! Sentiment scoring of entry text.
//!
//! The pipeline splits text into sentences ([`segment`]), classifies each one,
//! and aggregates the per-sentence results into one mood in `[-1, 1]`:
//!
//! 1. Fewer than three words: neutral, no model is consulted.
//! 2. The emotionality model says the sentence is not emotional: neutral.
//! 3. The polarity model's `positive` and `negative` probabilities differ by
//!    less than 0.1: neutral. Otherwise the larger one wins.
//!
//! The aggregate is `(positive - negative) / max(1, sentences)`, so neutral
//! sentences dilute the score.
//!
//! When either model failed to load, scoring returns
//! [`ClassifierError::Unavailable`]. A mood of `0.0` always means "computed and
//! neutral", never "could not compute".

pub mod classifier;
pub mod segment;

pub use classifier::{EmotionClassifier, ModelSlot, SentimentClassifier};

use crate::constants::{
    EMOTIONAL_LABEL, MIN_WORDS_FOR_CLASSIFICATION, MOOD_SCALE_MAX, NEGATIVE_LABEL,
    POLARITY_AMBIGUITY_THRESHOLD, POSITIVE_LABEL, SENTIMENT_TOP_K,
};
use crate::entry::Entry;
use crate::errors::ClassifierError;
use classifier::label_probability;
use segment::{count_words, split_sentences};
use tracing::{debug, info};

/// Polarity of one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Negative,
    Neutral,
    Positive,
}

impl Mood {
    pub fn value(self) -> i8 {
        match self {
            Mood::Negative => -1,
            Mood::Neutral => 0,
            Mood::Positive => 1,
        }
    }
}

/// Mood of the sentence at a 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceMood {
    pub sentence_number: usize,
    pub mood: Mood,
}

/// Result of scoring a text.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodReport {
    pub sentences: Vec<SentenceMood>,
    pub score: f64,
}

/// `(positive - negative) / max(1, total)`.
pub fn aggregate_mood(sentences: &[SentenceMood]) -> f64 {
    let positive = sentences
        .iter()
        .filter(|s| s.mood == Mood::Positive)
        .count() as f64;
    let negative = sentences
        .iter()
        .filter(|s| s.mood == Mood::Negative)
        .count() as f64;
    (positive - negative) / sentences.len().max(1) as f64
}

/// Maps a mood in `[-1, 1]` onto the 0..=10 gauge scale.
///
/// # Examples
///
/// ```
/// use quill::mood::mood_to_scale;
///
/// assert_eq!(mood_to_scale(-1.0), 0);
/// assert_eq!(mood_to_scale(0.0), 5);
/// assert_eq!(mood_to_scale(0.33), 7);
/// assert_eq!(mood_to_scale(1.0), 10);
/// ```
pub fn mood_to_scale(mood: f64) -> i32 {
    let rounded = (mood * 10.0).round() / 10.0;
    (((rounded + 1.0) * 5.0).round() as i32).clamp(0, MOOD_SCALE_MAX)
}

/// Scores text with the two sentence classifiers.
pub struct MoodScorer {
    emotion: ModelSlot<dyn EmotionClassifier>,
    sentiment: ModelSlot<dyn SentimentClassifier>,
}

impl MoodScorer {
    pub fn new(
        emotion: ModelSlot<dyn EmotionClassifier>,
        sentiment: ModelSlot<dyn SentimentClassifier>,
    ) -> Self {
        Self { emotion, sentiment }
    }

    /// Builds a scorer from two classifiers that are known to be loaded.
    pub fn with_classifiers(
        emotion: Box<dyn EmotionClassifier>,
        sentiment: Box<dyn SentimentClassifier>,
    ) -> Self {
        Self::new(ModelSlot::Loaded(emotion), ModelSlot::Loaded(sentiment))
    }

    /// Whether both classifiers loaded.
    pub fn is_available(&self) -> bool {
        self.emotion.is_loaded() && self.sentiment.is_loaded()
    }

    /// Classifies a single sentence.
    pub fn classify_sentence(&self, sentence: &str) -> Result<Mood, ClassifierError> {
        if count_words(sentence) < MIN_WORDS_FOR_CLASSIFICATION {
            return Ok(Mood::Neutral);
        }

        let emotional = self.emotion.get()?.predict_label(sentence)?;
        if !emotional.trim().eq_ignore_ascii_case(EMOTIONAL_LABEL) {
            return Ok(Mood::Neutral);
        }

        let labels = self
            .sentiment
            .get()?
            .predict_top_labels(sentence, SENTIMENT_TOP_K)?;
        let positive = label_probability(&labels, POSITIVE_LABEL);
        let negative = label_probability(&labels, NEGATIVE_LABEL);

        if (positive - negative).abs() < POLARITY_AMBIGUITY_THRESHOLD {
            Ok(Mood::Neutral)
        } else if positive > negative {
            Ok(Mood::Positive)
        } else {
            Ok(Mood::Negative)
        }
    }

    /// Scores every sentence of `text` and aggregates them.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Unavailable` if either model failed to load,
    /// or the classifier's own error if a prediction fails.
    pub fn score(&self, text: &str) -> Result<MoodReport, ClassifierError> {
        if !self.is_available() {
            // Surface the first missing model even if every sentence is short.
            self.emotion.get()?;
            self.sentiment.get()?;
        }

        let sentences = split_sentences(text)
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                Ok(SentenceMood {
                    sentence_number: index + 1,
                    mood: self.classify_sentence(sentence)?,
                })
            })
            .collect::<Result<Vec<_>, ClassifierError>>()?;

        let score = aggregate_mood(&sentences);
        debug!(
            "Scored {} sentences, aggregate mood {:.3}",
            sentences.len(),
            score
        );
        Ok(MoodReport { sentences, score })
    }
}

/// Scores an entry's text and writes the mood back onto it.
///
/// When the classifiers are unavailable the entry keeps its previous mood.
pub fn analyze_entry(entry: &mut Entry, scorer: &MoodScorer) -> Result<MoodReport, ClassifierError> {
    let report = scorer.score(&entry.plain_text())?;
    entry.set_mood(Some(report.score));
    info!("Entry {} scored with mood {:.3}", entry.id, report.score);
    Ok(report)
}
