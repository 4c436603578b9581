use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Backend, Config};
use crate::error::{Error, Result};
use crate::http::post_json;

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// A hosted model that turns an assembled prompt into text.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

impl Message {
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Clone, Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: String,
}

// --- Bedrock ---

#[derive(Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<InvokeContent>,
}

#[derive(Deserialize)]
struct InvokeContent {
    text: Option<String>,
}

/// Claude on Amazon Bedrock, authenticated with a Bedrock API key.
#[derive(Clone, Debug)]
pub struct BedrockClient {
    endpoint: String,
    model_id: String,
    token: String,
    max_tokens: u32,
    temperature: f32,
}

impl BedrockClient {
    pub fn new(
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model_id: model_id.into(),
            token: token.into(),
            max_tokens: 1000,
            temperature: 0.5,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let token = cfg.bedrock_token()?;
        Ok(Self::new(cfg.bedrock_endpoint.clone(), cfg.bedrock_model.clone(), token)
            .with_sampling(cfg.bedrock_max_tokens, cfg.bedrock_temperature))
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

impl Generator for BedrockClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/model/{}/invoke", self.endpoint, self.model_id);
        let req = InvokeRequest {
            anthropic_version: ANTHROPIC_VERSION,
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        debug!(model = %self.model_id, "invoking bedrock model");
        let res = post_json::<InvokeResponse, _>(&url, Some(self.token.as_str()), &req)?;
        res.content
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| Error::remote(Some(200), "Bedrock response had no text content"))
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}

// --- OpenRouter-style gateway ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions gateway.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl GatewayClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            max_tokens: 1000,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let key = cfg.openrouter_key()?;
        Ok(Self::new(cfg.openrouter_url.clone(), cfg.openrouter_model.clone(), key)
            .with_max_tokens(cfg.answer_max_tokens))
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn chat(&self, messages: &[Message], max_tokens: u32) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let req = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
        };
        debug!(model = %self.model, max_tokens, "calling chat gateway");
        let res = post_json::<ChatResponse, _>(&url, Some(self.api_key.as_str()), &req)?;
        res.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| Error::remote(Some(200), "Gateway response had no message content"))
    }
}

impl Generator for GatewayClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(&[Message::user(prompt)], self.max_tokens)
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

pub fn build_generator(cfg: &Config) -> Result<Box<dyn Generator>> {
    match cfg.backend()? {
        Backend::Bedrock => Ok(Box::new(BedrockClient::from_config(cfg)?)),
        Backend::OpenRouter => Ok(Box::new(GatewayClient::from_config(cfg)?)),
    }
}
