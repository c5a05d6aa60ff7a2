//! OpenAI-compatible chat-completions adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{MenuCompleter, OcrError};

const SERVICE: &str = "menu completion";

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that parses restaurant menu text into structured data. Extract the starter, main course, dessert, price, and any tags (like seafood, vegan, etc.) from the text.";

/// User turn sent with the detected text
pub fn user_prompt(text: &str) -> String {
    format!(
        "Parse this menu text into JSON format with the following fields: starter, main, dessert, price, tags. Here's the text:\n\n{text}"
    )
}

/// Chat-completion client for menu structuring
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn chat_request<'a>(model: &'a str, text: &str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: user_prompt(text),
            },
        ],
    }
}

fn first_choice(body: &[u8]) -> Result<String, OcrError> {
    let decoded: ChatResponse = serde_json::from_slice(body)
        .map_err(|e| OcrError::InvalidOutput(format!("invalid completion payload: {e}")))?;

    decoded
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| OcrError::InvalidOutput("completion has no content".to_string()))
}

#[async_trait]
impl MenuCompleter for ChatCompletionClient {
    async fn complete_menu(&self, text: &str) -> Result<String, OcrError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&chat_request(&self.model, text))
            .send()
            .await
            .map_err(|source| OcrError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| OcrError::Transport {
            service: SERVICE,
            source,
        })?;
        if !status.is_success() {
            return Err(OcrError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        first_choice(&body)
    }
}
