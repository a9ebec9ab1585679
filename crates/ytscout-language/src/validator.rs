//! OpenRouter chat-completions client that keeps English-titled videos.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ytscout_core::Video;

use crate::error::LanguageError;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_TOKENS: u32 = 10;
const AFFIRMATIVE: &str = "yes";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Asks a language model whether video titles are English.
///
/// Without an API key the validator is a pass-through. With one, any
/// classifier failure keeps the title (fail-open).
pub struct LanguageValidator {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    url: String,
}

impl LanguageValidator {
    /// Create a validator. A blank `api_key` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: Option<&str>, model: &str, base_url: &str) -> Result<Self, LanguageError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned);
        if api_key.is_none() {
            tracing::warn!("OpenRouter API key not set; language validation will be skipped");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.to_owned(),
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Whether `title` is English according to the classifier.
    ///
    /// Returns `true` when no key is configured, and on any request or parse
    /// failure (logged).
    pub async fn is_target_language(&self, title: &str) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            return true;
        };

        match self.classify(api_key, title).await {
            Ok(answer) => answer.trim().eq_ignore_ascii_case(AFFIRMATIVE),
            Err(e) => {
                tracing::warn!(title, error = %e, "language validation failed; keeping title");
                true
            }
        }
    }

    /// Keep videos whose titles pass [`Self::is_target_language`], in order.
    ///
    /// Titles are checked one at a time. Without an API key the input is
    /// returned unchanged.
    pub async fn filter_videos(&self, videos: Vec<Video>) -> Vec<Video> {
        if !self.is_enabled() {
            tracing::warn!("skipping language validation (no API key)");
            return videos;
        }

        let mut kept = Vec::with_capacity(videos.len());
        for video in videos {
            if self.is_target_language(video.title()).await {
                kept.push(video);
            } else {
                tracing::info!(title = video.title(), "filtered out non-English video");
            }
        }
        kept
    }

    async fn classify(&self, api_key: &str, title: &str) -> Result<String, LanguageError> {
        let prompt = build_prompt(title);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(LanguageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LanguageError::EmptyResponse)
    }
}

fn build_prompt(title: &str) -> String {
    format!(
        "Analyze the following video title and determine if it's in English.\n\
         Respond with only \"yes\" if the title is in English, or \"no\" if it's in another language.\n\
         \n\
         Title: {title}\n\
         \n\
         Is this title in English?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_title_and_single_word_instruction() {
        let prompt = build_prompt("Cómo crecer tu SaaS");
        assert!(prompt.contains("Title: Cómo crecer tu SaaS"));
        assert!(prompt.contains("Respond with only \"yes\""));
    }

    #[test]
    fn blank_key_disables_validation() {
        let v = LanguageValidator::new(Some("  "), DEFAULT_MODEL, DEFAULT_BASE_URL).unwrap();
        assert!(!v.is_enabled());
    }

    #[test]
    fn url_has_single_slash_before_endpoint() {
        let v = LanguageValidator::new(Some("k"), DEFAULT_MODEL, "http://localhost:9/api/v1/").unwrap();
        assert_eq!(v.url, "http://localhost:9/api/v1/chat/completions");
    }

    #[test]
    fn request_serializes_expected_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "m",
                "messages": [{ "role": "user", "content": "hi" }],
                "max_tokens": 10,
                "temperature": 0.0
            })
        );
    }
}
