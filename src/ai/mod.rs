pub mod decode;
pub mod gemini;
pub mod prompts;

use serde::Serialize;
use std::collections::HashMap;

use crate::models::content::{ContentType, GeneratedContent};
use crate::models::input::{GenerateInput, ImageInput};

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AiRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub json_output: bool,
    pub image: Option<ImageInput>,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AuthError,
    MalformedResponse,
    TransportError,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::AuthError,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::TransportError,
            message: message.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::AuthError
    }

    /// Message shown to the user in place of the result.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::AuthError => "Invalid API Key. Please update your API Key.".to_string(),
            ErrorKind::MalformedResponse => format!(
                "{}. The API might have returned an invalid JSON. This can happen if the AI struggles with the provided URL.",
                self.message.trim_end_matches('.')
            ),
            ErrorKind::TransportError => format!(
                "Failed to generate content: {}. If using a URL, it might be inaccessible or difficult for the AI to process.",
                self.message.trim_end_matches('.')
            ),
        }
    }
}

/// Failure text that indicates a rejected credential.
const AUTH_PHRASES: &[&str] = &["api key", "permission denied", "forbidden"];

/// Sort a provider failure into auth vs transport.
pub fn classify_failure(status: Option<u16>, text: &str) -> GenerationError {
    let lower = text.to_lowercase();
    let auth_status = matches!(status, Some(400 | 401 | 403));
    if auth_status || AUTH_PHRASES.iter().any(|p| lower.contains(p)) {
        GenerationError::auth(text)
    } else {
        GenerationError::transport(text)
    }
}

// ── Public API ────────────────────────────────────────

/// Build the request for `input` using generation settings.
pub fn build_request(settings: &HashMap<String, String>, input: &GenerateInput) -> AiRequest {
    let shop = prompts::ShopProfile::from_settings(settings);
    let prompt = match input.content_type {
        ContentType::Website => prompts::website(input),
        ContentType::Social => prompts::social(input, &shop),
    };
    let system = match input.content_type {
        ContentType::Website => prompts::website_system(),
        ContentType::Social => prompts::social_system(&shop),
    };

    AiRequest {
        system,
        prompt,
        max_tokens: setting_parse(settings, "gemini_max_tokens"),
        temperature: setting_parse(settings, "gemini_temperature"),
        top_p: setting_parse(settings, "gemini_top_p"),
        top_k: setting_parse(settings, "gemini_top_k"),
        json_output: true,
        image: input.image.clone(),
    }
}

/// Generate copy with the given completion function and decode the result.
pub fn generate_with<F>(
    settings: &HashMap<String, String>,
    input: &GenerateInput,
    complete: F,
) -> Result<GeneratedContent, GenerationError>
where
    F: FnOnce(&AiRequest) -> Result<AiResponse, GenerationError>,
{
    let req = build_request(settings, input);
    let resp = complete(&req)?;
    log::info!(
        "Generated {} content with {} ({} chars)",
        input.content_type.name(),
        resp.model,
        resp.text.len()
    );
    decode::decode(input.content_type, &resp.text, input.source_url().is_some())
}

/// Call Gemini with `api_key` and decode the structured result.
pub fn generate(
    api_key: &str,
    settings: &HashMap<String, String>,
    input: &GenerateInput,
) -> Result<GeneratedContent, GenerationError> {
    generate_with(settings, input, |req| gemini::call(api_key, settings, req))
}

fn setting_parse<T: std::str::FromStr>(settings: &HashMap<String, String>, key: &str) -> Option<T> {
    settings.get(key).and_then(|v| v.trim().parse().ok())
}
