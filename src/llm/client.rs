use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::{ContentPart, Role, Turn};
use crate::input::ImageAttachment;
use crate::prompt::Prompt;

use super::LanguageModel;

/// OpenAI-compatible chat completions client (works against OpenRouter and
/// any provider speaking the same wire format, including vision parts).
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentBlock>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

fn data_uri(image: &ImageAttachment) -> String {
    format!("data:{};base64,{}", image.media_type, image.data)
}

fn part_to_block(part: &ContentPart) -> ContentBlock {
    match part {
        ContentPart::Text { text } => ContentBlock::Text { text: text.clone() },
        ContentPart::Image { image } => ContentBlock::ImageUrl {
            image_url: ImageUrl {
                url: data_uri(image),
            },
        },
    }
}

fn turn_to_message(turn: &Turn) -> ChatMessage {
    let role = match turn.role {
        Role::User => "user",
        Role::Model => "assistant",
    };
    let content = if turn
        .parts
        .iter()
        .all(|p| matches!(p, ContentPart::Text { .. }))
    {
        MessageContent::Text(turn.text())
    } else {
        MessageContent::Parts(turn.parts.iter().map(part_to_block).collect())
    };
    ChatMessage {
        role: role.to_string(),
        content,
    }
}

impl ChatClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            max_tokens: 4096,
            messages,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error ({}): {}", status, body);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        if let Some(usage) = &api_response.usage {
            debug!(
                input_tokens = usage.prompt_tokens,
                output_tokens = usage.completion_tokens,
                "chat completion finished"
            );
        }

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("")
            .to_string();

        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for ChatClient {
    async fn synthesize(&self, prompt: &Prompt) -> Result<String> {
        let content = match &prompt.image {
            Some(image) => MessageContent::Parts(vec![
                ContentBlock::Text {
                    text: prompt.text.clone(),
                },
                ContentBlock::ImageUrl {
                    image_url: ImageUrl {
                        url: data_uri(image),
                    },
                },
            ]),
            None => MessageContent::Text(prompt.text.clone()),
        };

        self.complete(vec![ChatMessage {
            role: "user".to_string(),
            content,
        }])
        .await
    }

    async fn continue_chat(&self, history: &[Turn], message: &str) -> Result<String> {
        let mut messages: Vec<ChatMessage> = history.iter().map(turn_to_message).collect();
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Text(message.to_string()),
        });

        self.complete(messages).await
    }
}
