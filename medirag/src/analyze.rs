//! Free-text and image symptom analysis through the chat gateway. No retrieval is involved.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::generate::{ContentPart, GatewayClient, ImageUrl, Message};

pub const DESCRIPTION_INSTRUCTIONS: &str = "You are a medical expert. A patient will describe visual symptoms they see in an image (e.g., redness, wounds, fibers, swelling, or other irregularities). Based on the description, identify potential health issues, suggest next steps, and offer any warnings. Always add: 'Consult with a doctor before making any decisions.'

If the description is unclear or too vague, say: 'Unable to determine based on the description provided.'";

pub const IMAGE_INSTRUCTIONS: &str = "You are a medical expert analyzing patient images. Identify visible symptoms, health issues, or anomalies based on the image. Provide findings, recommendations, and next steps. Always include: 'Consult with a doctor before making any decisions.'

If the image is unclear, say: 'Unable to determine based on the image provided.'";

/// What an analysis was produced from; each kind has its own simplification prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisSource {
    Description,
    Image,
}

impl AnalysisSource {
    fn simplify_prompt(self, text: &str) -> String {
        match self {
            AnalysisSource::Description => format!("Explain this like I'm 5 years old:\n\n{}", text),
            AnalysisSource::Image => format!("Explain this like I'm 5:\n{}", text),
        }
    }
}

pub struct SymptomAnalyzer {
    gateway: GatewayClient,
    description_max_tokens: u32,
    image_max_tokens: u32,
    simplify_max_tokens: u32,
}

impl SymptomAnalyzer {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            gateway,
            description_max_tokens: 1200,
            image_max_tokens: 1500,
            simplify_max_tokens: 600,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let mut analyzer = Self::new(GatewayClient::from_config(cfg)?);
        analyzer.description_max_tokens = cfg.description_max_tokens;
        analyzer.image_max_tokens = cfg.image_max_tokens;
        analyzer.simplify_max_tokens = cfg.simplify_max_tokens;
        Ok(analyzer)
    }

    pub fn analyze_description(&self, description: &str) -> Result<String> {
        if description.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }
        let prompt = format!(
            "{}\n\nPatient description: {}",
            DESCRIPTION_INSTRUCTIONS, description
        );
        self.gateway
            .chat(&[Message::user(prompt)], self.description_max_tokens)
    }

    pub fn analyze_image(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "encoding image");
        let url = format!(
            "data:{};base64,{}",
            image_mime(path),
            STANDARD.encode(&bytes)
        );
        let message = Message::user(vec![
            ContentPart::Text {
                text: IMAGE_INSTRUCTIONS.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url,
                    detail: "high".to_string(),
                },
            },
        ]);
        self.gateway.chat(&[message], self.image_max_tokens)
    }

    /// Re-explains a previous analysis in plain language.
    pub fn explain_simply(&self, text: &str, source: AnalysisSource) -> Result<String> {
        let prompt = source.simplify_prompt(text);
        self.gateway
            .chat(&[Message::user(prompt)], self.simplify_max_tokens)
    }
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn analyzer(server: &MockServer) -> SymptomAnalyzer {
        SymptomAnalyzer::new(GatewayClient::new(server.base_url(), "gemma", "key"))
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"content": text}}]})
    }

    #[test]
    fn description_is_appended_to_instructions() {
        let server = MockServer::start();
        let call = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_includes("Patient description: red sores with fibers")
                .body_includes("\"max_tokens\":1200");
            then.status(200).json_body(reply("Possible irritation."));
        });

        let result = analyzer(&server)
            .analyze_description("red sores with fibers")
            .unwrap();
        assert_eq!(result, "Possible irritation.");
        call.assert_calls(1);
    }

    #[test]
    fn blank_description_is_rejected_before_any_call() {
        let server = MockServer::start();
        let call = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(reply("x"));
        });

        assert!(matches!(
            analyzer(&server).analyze_description("   "),
            Err(Error::EmptyQuestion)
        ));
        call.assert_calls(0);
    }

    #[test]
    fn image_is_sent_as_base64_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rash.PNG");
        fs::write(&path, [0u8, 0, 0]).unwrap();

        let server = MockServer::start();
        let call = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_includes("data:image/png;base64,AAAA")
                .body_includes("\"detail\":\"high\"")
                .body_includes("\"max_tokens\":1500");
            then.status(200).json_body(reply("Mild rash."));
        });

        assert_eq!(analyzer(&server).analyze_image(&path).unwrap(), "Mild rash.");
        call.assert_calls(1);
    }

    #[test]
    fn missing_image_is_an_io_error() {
        let server = MockServer::start();
        let err = analyzer(&server)
            .analyze_image(Path::new("/definitely/not/here.jpg"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn simplify_uses_short_budget() {
        let server = MockServer::start();
        let call = server.mock(|when, then| {
            when.method(POST)
                .body_includes("Explain this like I'm 5 years old:\\n\\nContact dermatitis.")
                .body_includes("\"max_tokens\":600");
            then.status(200).json_body(reply("Your skin is a bit angry."));
        });

        assert_eq!(
            analyzer(&server)
                .explain_simply("Contact dermatitis.", AnalysisSource::Description)
                .unwrap(),
            "Your skin is a bit angry."
        );
        call.assert_calls(1);
    }

    #[test]
    fn simplify_prompt_depends_on_source() {
        assert_eq!(
            AnalysisSource::Description.simplify_prompt("Eczema."),
            "Explain this like I'm 5 years old:\n\nEczema."
        );
        assert_eq!(
            AnalysisSource::Image.simplify_prompt("Eczema."),
            "Explain this like I'm 5:\nEczema."
        );
    }

    #[test]
    fn image_analysis_is_simplified_with_image_prompt() {
        let server = MockServer::start();
        let call = server.mock(|when, then| {
            when.method(POST)
                .body_includes("Explain this like I'm 5:\\nMild rash.");
            then.status(200).json_body(reply("A few red spots."));
        });

        assert_eq!(
            analyzer(&server)
                .explain_simply("Mild rash.", AnalysisSource::Image)
                .unwrap(),
            "A few red spots."
        );
        call.assert_calls(1);
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(image_mime(Path::new("a.png")), "image/png");
        assert_eq!(image_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a")), "image/jpeg");
    }
}
