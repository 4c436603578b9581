use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::post_json;

/// Turns query text into the vector space of the persisted index.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Serialize)]
struct EmbedLegacyRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Embeddings served by a local Ollama instance.
#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.ollama_url.clone(), cfg.embed_model.clone())
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embed", self.base_url);
        let req = EmbedRequest {
            model: &self.model,
            input: [text],
        };
        // Older Ollama builds only serve /api/embeddings; any other failure is surfaced as is.
        let value = match post_json::<Value, _>(&url, None, &req) {
            Ok(res) => res,
            Err(err) if err.status() == Some(404) => {
                debug!(error = %err, "falling back to legacy embeddings endpoint");
                let url = format!("{}/api/embeddings", self.base_url);
                let req = EmbedLegacyRequest {
                    model: &self.model,
                    prompt: text,
                };
                post_json::<Value, _>(&url, None, &req)?
            }
            Err(err) => return Err(err),
        };
        let vector = parse_embeddings(&value)?.into_iter().next().unwrap_or_default();
        if vector.is_empty() {
            return Err(Error::remote(Some(200), "Embedding response was empty"));
        }
        Ok(vector)
    }
}

fn parse_embeddings(value: &Value) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = value.get("embeddings") {
        return parse_embeddings_value(embeddings);
    }
    if let Some(embedding) = value.get("embedding") {
        return parse_embeddings_value(embedding);
    }
    Err(malformed("No embeddings in response"))
}

fn parse_embeddings_value(value: &Value) -> Result<Vec<Vec<f32>>> {
    let arr = value
        .as_array()
        .ok_or_else(|| malformed("Invalid embeddings format"))?;
    if arr.is_empty() {
        return Ok(vec![]);
    }
    if arr[0].is_array() {
        return arr.iter().map(parse_vec).collect();
    }
    Ok(vec![parse_vec(value)?])
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| malformed("Embedding is not an array"))?;
    arr.iter()
        .map(|v| {
            v.as_f64()
                .map(|n| n as f32)
                .ok_or_else(|| malformed("Embedding value is not a number"))
        })
        .collect()
}

fn malformed(msg: &str) -> Error {
    Error::remote(Some(200), msg)
}
