use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::GenerationError;
use crate::models::content::{
    BlockKind, ContentType, DescriptionBlock, GeneratedContent, SeoDocument, SocialPost,
    DEFAULT_HEADING_LEVEL,
};

pub const SEO_PLACEHOLDER: &str =
    "Product description could not be generated from the provided information.";
pub const INTRO_PLACEHOLDER: &str = "Content could not be generated from the provided information.";
/// Marker the model is told to use when a source URL could not be read.
pub const RETRIEVAL_SENTINEL: &str = "could not be retrieved";

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("valid fence regex")
    })
}

/// Remove a surrounding Markdown code fence, if the whole text is fenced.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match fence_re().captures(trimmed).and_then(|c| c.get(2)) {
        Some(body) if !body.as_str().is_empty() => body.as_str().trim(),
        _ => trimmed,
    }
}

/// Decode raw model output into the content shape that was requested.
/// With `from_source_url` some missing fields get placeholders instead of failing.
pub fn decode(
    content_type: ContentType,
    raw: &str,
    from_source_url: bool,
) -> Result<GeneratedContent, GenerationError> {
    let json = strip_code_fence(raw);
    let value: Value = serde_json::from_str(json).map_err(|e| {
        log::debug!(
            "Unparseable {} response: {}",
            content_type.name(),
            json.chars().take(500).collect::<String>()
        );
        GenerationError::malformed(format!("Failed to parse JSON response from API: {}", e))
    })?;

    let obj = payload_for(content_type, &value)?;
    match content_type {
        ContentType::Website => decode_seo(obj, from_source_url).map(GeneratedContent::Seo),
        ContentType::Social => decode_social(obj, from_source_url).map(GeneratedContent::Social),
    }
}

/// Accepts either the bare record or a `{"type": ..., "data": {...}}` envelope,
/// checking the envelope tag against what was asked for.
fn payload_for(content_type: ContentType, value: &Value) -> Result<&Map<String, Value>, GenerationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| GenerationError::malformed("Response is not a JSON object"))?;

    let tag = obj.get("type").and_then(|t| t.as_str());
    let data = obj.get("data").and_then(|d| d.as_object());
    match (tag, data) {
        (Some(tag), Some(data)) => match ContentType::from_str(tag) {
            Some(t) if t == content_type => Ok(data),
            _ => Err(GenerationError::malformed(format!(
                "Expected {} content but response was tagged \"{}\"",
                content_type.name(),
                tag
            ))),
        },
        _ => Ok(obj),
    }
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn opt_str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn decode_block(
    index: usize,
    value: &Value,
    from_source_url: bool,
) -> Result<DescriptionBlock, GenerationError> {
    let kind = match value.get("type").and_then(|t| t.as_str()) {
        Some("heading") => Some(BlockKind::Heading),
        Some("paragraph") => Some(BlockKind::Paragraph),
        _ => None,
    };
    let content = value.get("content").and_then(|c| c.as_str());

    match (kind, content) {
        (Some(BlockKind::Heading), Some(content)) => {
            let level = value
                .get("level")
                .and_then(|l| l.as_u64())
                .filter(|l| (2..=6).contains(l))
                .map_or(DEFAULT_HEADING_LEVEL, |l| l as u8);
            Ok(DescriptionBlock::heading(content, level))
        }
        (Some(BlockKind::Paragraph), Some(content)) => Ok(DescriptionBlock::paragraph(content)),
        (None, Some(content)) if from_source_url && content.contains(RETRIEVAL_SENTINEL) => {
            log::warn!("Keeping untyped retrieval notice at block {}", index);
            Ok(DescriptionBlock::paragraph(content))
        }
        _ => Err(GenerationError::malformed(format!(
            "Invalid block in SEO description (index {}): type or content is missing/invalid",
            index
        ))),
    }
}

fn decode_seo(obj: &Map<String, Value>, from_source_url: bool) -> Result<SeoDocument, GenerationError> {
    let product_title = str_field(obj, "productTitle").to_string();
    if product_title.is_empty() {
        log::warn!("productTitle is missing or empty (source URL: {})", from_source_url);
    }

    let blocks = obj
        .get("seoDescription")
        .and_then(|v| v.as_array())
        .filter(|arr| !arr.is_empty());
    let sections = match blocks {
        Some(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, b)| decode_block(i, b, from_source_url))
            .collect::<Result<Vec<_>, _>>()?,
        None if from_source_url => {
            log::warn!("seoDescription missing or empty; using placeholder for URL request");
            vec![DescriptionBlock::paragraph(SEO_PLACEHOLDER)]
        }
        None => {
            return Err(GenerationError::malformed(
                "Received incomplete SeoContent: seoDescription is missing/empty",
            ))
        }
    };

    Ok(SeoDocument {
        product_title,
        sections,
        h1_headings: string_list(obj, "h1Headings"),
        broad_match_keywords: string_list(obj, "broadMatchKeywords"),
        meta_title: str_field(obj, "metaTitle").to_string(),
        meta_description: str_field(obj, "metaDescription").to_string(),
    })
}

fn decode_social(obj: &Map<String, Value>, from_source_url: bool) -> Result<SocialPost, GenerationError> {
    let title = str_field(obj, "title").to_string();
    if title.is_empty() {
        log::warn!("Social post title is missing (source URL: {})", from_source_url);
    }

    let intro = match opt_str_field(obj, "intro") {
        Some(intro) => intro,
        None if from_source_url => {
            log::warn!("Social post intro missing; using placeholder for URL request");
            INTRO_PLACEHOLDER.to_string()
        }
        None => {
            return Err(GenerationError::malformed(
                "Received incomplete SocialMediaPost: intro is missing",
            ))
        }
    };

    let call_to_action = opt_str_field(obj, "callToAction");
    let hashtags_present = obj.get("hashtags").is_some_and(|h| h.is_array());
    let call_to_action = match call_to_action {
        Some(cta) if hashtags_present => cta,
        _ => {
            return Err(GenerationError::malformed(
                "Received incomplete or malformed JSON structure for SocialMediaPost from API (callToAction or hashtags)",
            ))
        }
    };

    Ok(SocialPost {
        title,
        intro,
        key_benefits_section: opt_str_field(obj, "keyBenefitsSection"),
        key_ingredients_section: opt_str_field(obj, "keyIngredientsSection"),
        how_to_use_section: opt_str_field(obj, "howToUseSection"),
        closing_statement: opt_str_field(obj, "closingStatement"),
        call_to_action,
        hashtags: string_list(obj, "hashtags"),
    })
}
