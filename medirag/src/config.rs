use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const BEDROCK_TOKEN_VAR: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Bedrock,
    OpenRouter,
}

impl Backend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "bedrock" => Ok(Backend::Bedrock),
            "openrouter" | "gateway" => Ok(Backend::OpenRouter),
            other => Err(Error::InvalidConfig(format!(
                "MEDIBOT_BACKEND must be bedrock or openrouter, got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: String,
    pub index_dir: PathBuf,
    pub top_k: usize,
    pub export_path: PathBuf,
    pub ollama_url: String,
    pub embed_model: String,
    pub aws_region: String,
    pub bedrock_model: String,
    pub bedrock_endpoint: String,
    pub bedrock_token: Option<String>,
    pub bedrock_max_tokens: u32,
    pub bedrock_temperature: f32,
    pub openrouter_url: String,
    pub openrouter_model: String,
    pub openrouter_key: Option<String>,
    pub answer_max_tokens: u32,
    pub description_max_tokens: u32,
    pub image_max_tokens: u32,
    pub simplify_max_tokens: u32,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present so credentials work without manual `source .env`.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let aws_region = get("AWS_REGION").unwrap_or_else(|| "us-west-2".to_string());
        Self {
            backend: get("MEDIBOT_BACKEND").unwrap_or_else(|| "bedrock".to_string()),
            index_dir: get("MEDIBOT_INDEX_DIR")
                .unwrap_or_else(|| "vectorstore/db_index".to_string())
                .into(),
            top_k: get("MEDIBOT_TOP_K")
                .and_then(|v| v.parse().ok())
                .filter(|k| *k > 0)
                .unwrap_or(3),
            export_path: get("MEDIBOT_EXPORT_PATH")
                .unwrap_or_else(|| "medibot_chat_history.csv".to_string())
                .into(),
            ollama_url: get("OLLAMA_URL").unwrap_or_else(|| "http://localhost:11434".to_string()),
            embed_model: get("OLLAMA_EMBED_MODEL").unwrap_or_else(|| "all-minilm".to_string()),
            bedrock_model: get("BEDROCK_MODEL_ID")
                .unwrap_or_else(|| "anthropic.claude-3-sonnet-20240229-v1:0".to_string()),
            bedrock_endpoint: get("BEDROCK_ENDPOINT")
                .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", aws_region)),
            aws_region,
            bedrock_token: get(BEDROCK_TOKEN_VAR),
            bedrock_max_tokens: 1000,
            bedrock_temperature: 0.5,
            openrouter_url: get("OPENROUTER_URL")
                .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string()),
            openrouter_model: get("OPENROUTER_MODEL")
                .unwrap_or_else(|| "google/gemma-3n-e4b-it:free".to_string()),
            openrouter_key: get(OPENROUTER_KEY_VAR),
            answer_max_tokens: 1000,
            description_max_tokens: 1200,
            image_max_tokens: 1500,
            simplify_max_tokens: 600,
        }
    }

    pub fn backend(&self) -> Result<Backend> {
        Backend::parse(&self.backend)
    }

    pub fn bedrock_token(&self) -> Result<&str> {
        self.bedrock_token
            .as_deref()
            .ok_or_else(|| Error::config_missing(BEDROCK_TOKEN_VAR))
    }

    pub fn openrouter_key(&self) -> Result<&str> {
        self.openrouter_key
            .as_deref()
            .ok_or_else(|| Error::config_missing(OPENROUTER_KEY_VAR))
    }
}
