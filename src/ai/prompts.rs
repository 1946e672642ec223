//! Prompts that turn a chat model into a sentence classifier.

use super::ollama::Message;

/// System prompt shared by both classifiers.
pub const SYSTEM_PROMPT: &str = r#"You are a precise text classifier for private diary sentences.
You never explain, never apologise and never add text around your answer.
Treat every sentence as confidential."#;

/// Builds messages asking whether a sentence expresses emotion.
///
/// The model is told to answer with exactly `Yes` or `No`.
pub fn emotion_prompt(sentence: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"Does the following sentence express an emotion or feeling of the writer?
Answer with exactly one word: Yes or No.

Sentence:
---
{}
---"#,
            sentence
        )),
    ]
}

/// Builds messages asking for polarity probabilities of a sentence.
///
/// The model is told to answer with a JSON object mapping the labels
/// `positive`, `negative` and `neutral` to probabilities summing to 1.
pub fn sentiment_prompt(sentence: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"Classify the sentiment of the following sentence.
Answer only with a JSON object whose keys are "positive", "negative" and "neutral"
and whose values are probabilities between 0 and 1 that sum to 1.

Sentence:
---
{}
---"#,
            sentence
        )),
    ]
}
