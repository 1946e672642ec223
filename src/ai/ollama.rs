//! Ollama HTTP client and the classifier adapter built on it.
//!
//! [`OllamaClassifier`] implements both sentence classifier traits by prompting
//! a local chat model. Loading checks that the model is installed, so a missing
//! model is reported once, up front, as `ClassifierError::Unavailable`.

use super::prompts::{emotion_prompt, sentiment_prompt};
use crate::errors::ClassifierError;
use crate::mood::{EmotionClassifier, SentimentClassifier};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user, assistant)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Message,
}

/// Response from the installed-models listing.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for interacting with Ollama API.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

impl OllamaClient {
    /// Creates a new Ollama client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Ollama API (e.g., "http://127.0.0.1:11434")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Lists the names of installed models.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or answers with something
    /// other than a model listing.
    pub fn list_models(&self) -> Result<Vec<String>, ClassifierError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(ClassifierError::ServerOffline)?;

        if !response.status().is_success() {
            return Err(ClassifierError::InvalidResponse(format!(
                "HTTP {} while listing models",
                response.status()
            )));
        }

        let tags: TagsResponse = response.json().map_err(|e| {
            ClassifierError::InvalidResponse(format!("Failed to parse model list: {}", e))
        })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Sends a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Ollama API is not reachable
    /// - Model is not found
    /// - API returns an error response
    pub fn chat(&self, model: &str, messages: &[Message]) -> Result<String, ClassifierError> {
        debug!("Sending chat request with model: {}", model);

        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(ClassifierError::ServerOffline)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(ClassifierError::Unavailable {
                    model: model.to_string(),
                    reason: "model not found on server".to_string(),
                });
            }

            return Err(ClassifierError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().map_err(|e| {
            ClassifierError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        Ok(chat_response.message.content)
    }
}

/// Sentence classifier backed by an Ollama chat model.
pub struct OllamaClassifier {
    client: OllamaClient,
    model: String,
}

impl OllamaClassifier {
    /// Connects to the server and checks that `model` is installed.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Unavailable` when the server cannot be reached
    /// or the model is not installed.
    pub fn load(base_url: &str, model: &str) -> Result<Self, ClassifierError> {
        let client = OllamaClient::new(base_url);
        let installed = client
            .list_models()
            .map_err(|e| ClassifierError::Unavailable {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        if !installed.iter().any(|name| model_matches(name, model)) {
            return Err(ClassifierError::Unavailable {
                model: model.to_string(),
                reason: format!("not installed. Try: ollama pull {}", model),
            });
        }

        debug!("Loaded classifier model {}", model);
        Ok(Self {
            client,
            model: model.to_string(),
        })
    }
}

impl EmotionClassifier for OllamaClassifier {
    fn predict_label(&self, text: &str) -> Result<String, ClassifierError> {
        let answer = self.client.chat(&self.model, &emotion_prompt(text))?;
        Ok(parse_yes_no(&answer).to_string())
    }
}

impl SentimentClassifier for OllamaClassifier {
    fn predict_top_labels(
        &self,
        text: &str,
        k: usize,
    ) -> Result<HashMap<String, f64>, ClassifierError> {
        let answer = self.client.chat(&self.model, &sentiment_prompt(text))?;
        parse_label_probabilities(&answer, k)
    }
}

/// `llama3.2` matches an installed `llama3.2:latest`.
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted
        || installed
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(':'))
}

fn parse_yes_no(answer: &str) -> &'static str {
    let normalized = answer
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_ascii_lowercase();
    if normalized.starts_with("yes") {
        "Yes"
    } else {
        "No"
    }
}

/// Extracts the JSON object from a model answer and keeps the `k` most likely labels.
fn parse_label_probabilities(
    answer: &str,
    k: usize,
) -> Result<HashMap<String, f64>, ClassifierError> {
    let (Some(start), Some(end)) = (answer.find('{'), answer.rfind('}')) else {
        return Err(ClassifierError::InvalidResponse(format!(
            "no JSON object in sentiment answer: {}",
            answer
        )));
    };
    if end < start {
        return Err(ClassifierError::InvalidResponse(
            "malformed JSON object in sentiment answer".to_string(),
        ));
    }

    let raw: HashMap<String, f64> = serde_json::from_str(&answer[start..=end]).map_err(|e| {
        ClassifierError::InvalidResponse(format!("Failed to parse sentiment answer: {}", e))
    })?;

    let mut labels: Vec<(String, f64)> = raw
        .into_iter()
        .map(|(label, probability)| (label.to_lowercase(), probability))
        .collect();
    labels.sort_by(|a, b| b.1.total_cmp(&a.1));
    labels.truncate(k);
    Ok(labels.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let system = Message::system("Classify");
        assert_eq!(system.role, "system");
        let user = Message::user("Hello");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "Hello");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_model_matches() {
        assert!(model_matches("llama3.2:3b", "llama3.2:3b"));
        assert!(model_matches("llama3.2:latest", "llama3.2"));
        assert!(!model_matches("llama3.20:latest", "llama3.2"));
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("Yes"), "Yes");
        assert_eq!(parse_yes_no("  yes.\n"), "Yes");
        assert_eq!(parse_yes_no("\"No\""), "No");
        assert_eq!(parse_yes_no("I cannot tell"), "No");
    }

    #[test]
    fn test_parse_label_probabilities_keeps_top_k() {
        let answer = r#"Sure: {"Positive": 0.7, "negative": 0.2, "neutral": 0.1}"#;
        let labels = parse_label_probabilities(answer, 2).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["positive"], 0.7);
        assert_eq!(labels["negative"], 0.2);
        assert!(!labels.contains_key("neutral"));
    }

    #[test]
    fn test_parse_label_probabilities_rejects_prose() {
        assert!(parse_label_probabilities("positive, mostly", 3).is_err());
    }
}
