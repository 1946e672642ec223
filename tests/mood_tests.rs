use chrono::{TimeZone, Utc};
use quill::entry::{ContentBlock, Entry, TextSize};
use quill::errors::ClassifierError;
use quill::mood::segment::{count_words, split_sentences};
use quill::mood::{
    aggregate_mood, analyze_entry, mood_to_scale, EmotionClassifier, ModelSlot, Mood, MoodScorer,
    SentenceMood, SentimentClassifier,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Emotional when the sentence mentions love or hate.
struct KeywordEmotion {
    calls: Arc<AtomicUsize>,
}

impl EmotionClassifier for KeywordEmotion {
    fn predict_label(&self, text: &str) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let emotional = text.contains("love") || text.contains("hate");
        Ok(if emotional { "yes" } else { "No" }.to_string())
    }
}

struct KeywordSentiment;

impl SentimentClassifier for KeywordSentiment {
    fn predict_top_labels(
        &self,
        text: &str,
        _k: usize,
    ) -> Result<HashMap<String, f64>, ClassifierError> {
        let (positive, negative) = if text.contains("love") {
            (0.9, 0.05)
        } else {
            (0.05, 0.9)
        };
        Ok(HashMap::from([
            ("positive".to_string(), positive),
            ("negative".to_string(), negative),
        ]))
    }
}

/// Always close to a tie.
struct Torn;

impl SentimentClassifier for Torn {
    fn predict_top_labels(
        &self,
        _text: &str,
        _k: usize,
    ) -> Result<HashMap<String, f64>, ClassifierError> {
        Ok(HashMap::from([
            ("positive".to_string(), 0.48),
            ("negative".to_string(), 0.42),
            ("neutral".to_string(), 0.10),
        ]))
    }
}

struct Broken;

impl SentimentClassifier for Broken {
    fn predict_top_labels(
        &self,
        _text: &str,
        _k: usize,
    ) -> Result<HashMap<String, f64>, ClassifierError> {
        Err(ClassifierError::InvalidResponse("garbled".to_string()))
    }
}

fn keyword_scorer() -> (MoodScorer, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let scorer = MoodScorer::with_classifiers(
        Box::new(KeywordEmotion {
            calls: Arc::clone(&calls),
        }),
        Box::new(KeywordSentiment),
    );
    (scorer, calls)
}

#[test]
fn test_split_sentences_per_line() {
    let text = "Woke up early.   Coffee!\n\nWhere did the day go? Nowhere\n  trailing words";
    assert_eq!(
        split_sentences(text),
        vec!["Woke up early.", "Coffee!", "", "Nowhere", "trailing words"]
    );
}

#[test]
fn test_split_sentences_empty_and_blank() {
    assert!(split_sentences("").is_empty());
    assert!(split_sentences("   \n\t\n").is_empty());
    assert_eq!(split_sentences("..."), vec![".", ".", "."]);
}

#[test]
fn test_count_words() {
    assert_eq!(count_words("  one two\tthree\nfour "), 4);
    assert_eq!(count_words(""), 0);
}

#[test]
fn test_score_mixed_text() {
    let (scorer, _) = keyword_scorer();
    let report = scorer
        .score("I love this sunny day. I love my friends. I hate the cold rain. Is it late? Ok.")
        .unwrap();

    let moods: Vec<Mood> = report.sentences.iter().map(|s| s.mood).collect();
    assert_eq!(
        moods,
        vec![
            Mood::Positive,
            Mood::Positive,
            Mood::Negative,
            Mood::Neutral,
            Mood::Neutral
        ]
    );
    assert_eq!(report.sentences[4].sentence_number, 5);
    assert!((report.score - 0.2).abs() < 1e-9);
}

#[test]
fn test_short_sentences_skip_the_classifier() {
    let (scorer, calls) = keyword_scorer();
    let report = scorer.score("Love it. Love you.").unwrap();

    assert!(report.sentences.iter().all(|s| s.mood == Mood::Neutral));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(report.score, 0.0);
}

#[test]
fn test_close_probabilities_are_neutral() {
    let scorer = MoodScorer::with_classifiers(
        Box::new(KeywordEmotion {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Box::new(Torn),
    );
    assert_eq!(
        scorer.classify_sentence("I love and hate this.").unwrap(),
        Mood::Neutral
    );
}

#[test]
fn test_empty_text_scores_zero() {
    let (scorer, _) = keyword_scorer();
    let report = scorer.score("").unwrap();
    assert!(report.sentences.is_empty());
    assert_eq!(report.score, 0.0);
}

#[test]
fn test_missing_model_is_unavailable_even_for_short_text() {
    let scorer = MoodScorer::new(
        ModelSlot::Loaded(Box::new(KeywordEmotion {
            calls: Arc::new(AtomicUsize::new(0)),
        }) as Box<dyn EmotionClassifier>),
        ModelSlot::Missing {
            model: "sentiment-small".to_string(),
            reason: "not installed".to_string(),
        },
    );

    assert!(!scorer.is_available());
    match scorer.score("Hi.") {
        Err(ClassifierError::Unavailable { model, .. }) => assert_eq!(model, "sentiment-small"),
        other => panic!("expected unavailable, got {:?}", other),
    }
}

#[test]
fn test_classifier_failure_propagates() {
    let scorer = MoodScorer::with_classifiers(
        Box::new(KeywordEmotion {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Box::new(Broken),
    );
    assert!(matches!(
        scorer.score("I hate waiting in line."),
        Err(ClassifierError::InvalidResponse(_))
    ));
}

#[test]
fn test_analyze_entry_stores_mood() {
    let (scorer, _) = keyword_scorer();
    let mut entry = Entry::with_blocks(
        "Weekend",
        Utc.with_ymd_and_hms(2024, 9, 14, 18, 0, 0).unwrap(),
        vec![
            ContentBlock::text(TextSize::H1, "I love long walks."),
            ContentBlock::images(vec![vec![1, 2, 3]]),
            ContentBlock::text(TextSize::H3, "I hate missing the bus."),
        ],
    );

    let report = analyze_entry(&mut entry, &scorer).unwrap();
    assert_eq!(report.sentences.len(), 2);
    assert_eq!(entry.mood(), Some(0.0));
}

#[test]
fn test_aggregate_and_scale() {
    let sentences = [
        SentenceMood {
            sentence_number: 1,
            mood: Mood::Positive,
        },
        SentenceMood {
            sentence_number: 2,
            mood: Mood::Positive,
        },
        SentenceMood {
            sentence_number: 3,
            mood: Mood::Negative,
        },
    ];
    let mood = aggregate_mood(&sentences);
    assert!((mood - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(mood_to_scale(mood), 7);
    assert_eq!(aggregate_mood(&[]), 0.0);
    assert_eq!(mood_to_scale(-0.5), 3);
}
