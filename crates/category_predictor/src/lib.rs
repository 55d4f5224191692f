//! Question → category classification through a hosted chat model.
//!
//! Every conversation starts from the same instruction template and a
//! fixed set of example question→label turns, decoded deterministically
//! (temperature 0). The model owns label quality: a reply outside the
//! 18-category enumeration is surfaced in the logs, never coerced.

mod prompt;

use std::env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use table_parser::league::is_known_category;

pub use prompt::{few_shot_history, wrap_question};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: String) -> Self {
        Self { role: "user".to_string(), parts: vec![Part { text }] }
    }

    pub fn model(text: String) -> Self {
        Self { role: "model".to_string(), parts: vec![Part { text }] }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Serialize, Debug)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn safety_settings() -> Vec<SafetySetting> {
    const THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting { category, threshold: THRESHOLD })
    .collect()
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: &'a [Content],
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Content,
}

fn first_candidate_text(response: GenerateResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .context("model response contained no candidates")
}

/// Client for the hosted chat model.
pub struct CategoryPredictor {
    client: reqwest::Client,
    base: String,
    api_key: String,
    model: String,
}

impl CategoryPredictor {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: API_BASE.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(env::var("GEMINI_KEY").context("GEMINI_KEY is not set")?))
    }

    /// A fresh conversation seeded with the few-shot examples.
    pub fn conversation(&self) -> Conversation<'_> {
        Conversation { predictor: self, history: few_shot_history() }
    }

    /// Classify a single question in its own conversation.
    pub async fn predict(&self, question: &str) -> Result<String> {
        self.conversation().send(question).await
    }

    /// Classify questions sequentially through one growing conversation.
    pub async fn predict_all(&self, questions: &[String]) -> Result<Vec<String>> {
        let mut conversation = self.conversation();
        let mut labels = Vec::with_capacity(questions.len());
        for question in questions {
            labels.push(conversation.send(question).await?);
        }
        Ok(labels)
    }

    async fn generate(&self, contents: &[Content]) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base, self.model, self.api_key
        );
        let request = GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 2048,
            },
            safety_settings: safety_settings(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("model request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("model HTTP {status}: {body}");
        }
        let parsed: GenerateResponse =
            response.json().await.context("model response did not parse")?;
        first_candidate_text(parsed)
    }
}

/// One chat with the model. History starts at the few-shot seed and grows
/// with every exchange, mirroring how the source pipeline batched its
/// predictions.
pub struct Conversation<'a> {
    predictor: &'a CategoryPredictor,
    history: Vec<Content>,
}

impl Conversation<'_> {
    /// Ask for one label. The user/model turn pair is committed to the
    /// history only once the request succeeds, so a failed send leaves
    /// the conversation in a retryable state with its roles alternating.
    pub async fn send(&mut self, question: &str) -> Result<String> {
        let mut contents = self.history.clone();
        contents.push(Content::user(wrap_question(question)));
        let reply = self.predictor.generate(&contents).await?;
        let label = reply.trim().to_string();
        if !is_known_category(&label) {
            warn!("model returned a label outside the category enumeration: {label:?}");
        }
        self.history = contents;
        self.history.push(Content::model(reply));
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_config() {
        let contents = vec![Content::user("q".to_string())];
        let request = GenerateRequest {
            contents: &contents,
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 2048,
            },
            safety_settings: safety_settings(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
        assert_eq!(value["generationConfig"]["topK"], 1);
        assert_eq!(value["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(value["contents"][0]["role"], "user");
    }

    #[test]
    fn response_text_comes_from_the_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "SCIENCE"}]}},
                {"content": {"role": "model", "parts": [{"text": "ART"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_candidate_text(parsed).unwrap(), "SCIENCE");
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(first_candidate_text(parsed).is_err());
    }

    #[tokio::test]
    async fn failed_request_leaves_the_conversation_retryable() {
        let mut predictor = CategoryPredictor::new("unused".to_string());
        predictor.base = "http://127.0.0.1:9".to_string();

        let mut conversation = predictor.conversation();
        let seed_len = conversation.history.len();

        assert!(conversation.send("q1").await.is_err());
        assert_eq!(conversation.history.len(), seed_len);
        assert_eq!(conversation.history.last().unwrap().role, "model");

        // A retry must not stack unanswered user turns.
        assert!(conversation.send("q2").await.is_err());
        assert_eq!(conversation.history.len(), seed_len);
    }
}
