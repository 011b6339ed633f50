use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use super::{classify_failure, AiRequest, AiResponse, GenerationError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub fn endpoint(settings: &HashMap<String, String>, api_key: &str) -> (String, String) {
    let base = settings
        .get("gemini_base_url")
        .map(|s| s.trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let model = settings
        .get("gemini_model")
        .cloned()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        base, model, api_key
    );
    (url, model)
}

pub fn build_body(req: &AiRequest) -> Value {
    let mut parts = vec![json!({"text": format!("{}\n\n{}", req.system, req.prompt)})];
    if let Some(ref img) = req.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": img.mime_type,
                "data": img.base64
            }
        }));
    }

    let mut config = json!({
        "temperature": req.temperature.unwrap_or(0.75),
        "topP": req.top_p.unwrap_or(0.95),
        "topK": req.top_k.unwrap_or(40),
    });
    if let Some(max) = req.max_tokens {
        config["maxOutputTokens"] = json!(max);
    }
    if req.json_output {
        config["responseMimeType"] = json!("application/json");
    }

    json!({
        "contents": [{"parts": parts}],
        "generationConfig": config
    })
}

/// Text of the first candidate's first part.
pub fn extract_text(json: &Value) -> Option<String> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub fn call(
    api_key: &str,
    settings: &HashMap<String, String>,
    req: &AiRequest,
) -> Result<AiResponse, GenerationError> {
    if api_key.trim().is_empty() {
        return Err(GenerationError::auth(
            "API Key is missing. Please configure the API Key.",
        ));
    }

    let (url, model) = endpoint(settings, api_key.trim());
    let timeout = settings
        .get("gemini_timeout_secs")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| GenerationError::transport(format!("HTTP client error: {}", e)))?;

    log::info!("Calling Gemini model {}", model);
    let resp = client
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&build_body(req))
        .send()
        .map_err(|e| classify_failure(None, &format!("Gemini request failed: {}", e.without_url())))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        log::warn!("Gemini returned {}", status);
        return Err(classify_failure(
            Some(status.as_u16()),
            &format!("Gemini returned {}: {}", status, text),
        ));
    }

    let json: Value = resp
        .json()
        .map_err(|e| GenerationError::malformed(format!("Gemini JSON parse error: {}", e)))?;

    let text = extract_text(&json).ok_or_else(|| {
        let reason = json
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(|r| r.as_str())
            .unwrap_or("no candidates");
        GenerationError::malformed(format!("Gemini returned an empty response ({})", reason))
    })?;

    Ok(AiResponse { text, model })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::input::ImageInput;

    fn request() -> AiRequest {
        AiRequest {
            system: "sys".into(),
            prompt: "prompt".into(),
            max_tokens: None,
            temperature: Some(0.5),
            top_p: None,
            top_k: Some(20),
            json_output: true,
            image: None,
        }
    }

    #[test]
    fn body_has_prompt_and_config() {
        let body = build_body(&request());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "sys\n\nprompt");
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["topK"], 20);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn body_inlines_image() {
        let mut req = request();
        req.image = Some(ImageInput {
            base64: "AAAA".into(),
            mime_type: "image/webp".into(),
        });
        let body = build_body(&req);
        let part = &body["contents"][0]["parts"][1]["inline_data"];
        assert_eq!(part["mime_type"], "image/webp");
        assert_eq!(part["data"], "AAAA");
    }

    #[test]
    fn endpoint_defaults_and_overrides() {
        let (url, model) = endpoint(&HashMap::new(), "k");
        assert_eq!(model, DEFAULT_MODEL);
        assert!(url.starts_with("https://generativelanguage.googleapis.com/v1beta/models/"));
        assert!(url.ends_with(":generateContent?key=k"));

        let mut s = HashMap::new();
        s.insert("gemini_base_url".to_string(), "http://localhost:9000/".to_string());
        s.insert("gemini_model".to_string(), "gemini-test".to_string());
        let (url, _) = endpoint(&s, "k");
        assert_eq!(url, "http://localhost:9000/v1beta/models/gemini-test:generateContent?key=k");
    }

    #[test]
    fn extracts_candidate_text() {
        let v = json!({"candidates": [{"content": {"parts": [{"text": " {\"a\":1} "}]}}]});
        assert_eq!(extract_text(&v).as_deref(), Some("{\"a\":1}"));
        assert_eq!(extract_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn missing_key_is_auth_error() {
        let err = call("  ", &HashMap::new(), &request()).unwrap_err();
        assert!(err.is_auth());
    }
}
