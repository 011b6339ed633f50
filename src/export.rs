use std::sync::OnceLock;

use regex::Regex;

use crate::models::content::{GeneratedContent, SeoDocument, SocialPost};
use crate::render;

const RULE: &str = "------------------------------------";
const FALLBACK_FILENAME: &str = "generated_content.txt";
const SOCIAL_TITLE_CHARS: usize = 30;

/// Flat text dump of an SEO document: readable text, HTML, then SEO metadata.
pub fn seo_plain_dump(doc: &SeoDocument) -> String {
    let mut text = format!("Product Title: {}\n\n", doc.product_title);

    text.push_str("SEO Description (Text):\n");
    text.push_str(RULE);
    text.push('\n');
    for block in &doc.sections {
        if block.is_heading() {
            text.push_str(&format!("\n## {}\n\n", block.content));
        } else {
            text.push_str(&format!("{}\n\n", block.content));
        }
    }

    text.push_str("\nSEO Description (HTML):\n");
    text.push_str(RULE);
    text.push('\n');
    text.push_str(&render::to_html(&doc.sections));
    text.push('\n');
    text.push_str(RULE);
    text.push_str("\n\n");

    text.push_str("\nSuggested H1 Headings:\n");
    for h in &doc.h1_headings {
        text.push_str(&format!("- {}\n", h));
    }
    text.push_str("\nBroad Match Keywords:\n");
    for k in &doc.broad_match_keywords {
        text.push_str(&format!("- {}\n", k));
    }

    text.push_str(&format!(
        "\nMeta Title: {}\n\nMeta Description: {}\n",
        doc.meta_title, doc.meta_description
    ));
    text
}

/// Social post as it would be pasted: one blank line between blocks.
pub fn social_plain_dump(post: &SocialPost) -> String {
    let mut text = format!("{}\n\n{}\n\n", post.title, post.intro);
    for section in post.present_sections() {
        text.push_str(section);
        text.push_str("\n\n");
    }
    text.push_str(&format!(
        "{}\n\nHashtags:\n{}\n",
        post.call_to_action,
        post.hashtags.join(" ")
    ));
    text
}

pub fn plain_dump(content: &GeneratedContent) -> String {
    match content {
        GeneratedContent::Seo(doc) => seo_plain_dump(doc),
        GeneratedContent::Social(post) => social_plain_dump(post),
    }
}

/// Section contents only, separated by blank lines.
pub fn description_text(doc: &SeoDocument) -> String {
    doc.sections
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ── Filenames ─────────────────────────────────────────

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn unsafe_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).expect("valid path regex"))
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid word regex"))
}

/// Filename core for an SEO export: spaces become `_`, punctuation is kept
/// apart from characters a filesystem or header would reject.
pub fn seo_filename_core(title: &str) -> String {
    let spaced = whitespace_re().replace_all(title, "_");
    unsafe_path_re().replace_all(&spaced, "").into_owned()
}

/// Filename core for a social export: first 30 chars, ASCII word chars only.
pub fn social_filename_core(title: &str) -> String {
    let head: String = title.chars().take(SOCIAL_TITLE_CHARS).collect();
    let spaced = whitespace_re().replace_all(&head, "_");
    non_word_re().replace_all(&spaced, "").into_owned()
}

pub fn export_filename(content: &GeneratedContent) -> String {
    let (core, suffix) = match content {
        GeneratedContent::Seo(doc) => (seo_filename_core(&doc.product_title), "_seo_content.txt"),
        GeneratedContent::Social(post) => (social_filename_core(&post.title), "_social_post.txt"),
    };
    if core.trim_matches('_').is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    format!("{}{}", core, suffix)
}

// ── Copyable fields ───────────────────────────────────

/// Every field a copy action can ask for.
pub const COPY_FIELDS: &[&str] = &["full", "description", "html", "meta_title", "meta_description"];

/// Text for a single copy action, or `None` when the field does not apply.
pub fn copy_field(content: &GeneratedContent, field: &str) -> Option<String> {
    if field == "full" {
        return Some(plain_dump(content));
    }
    let doc = content.as_seo()?;
    match field {
        "description" => Some(description_text(doc)),
        "html" => Some(render::to_html(&doc.sections)),
        "meta_title" => Some(doc.meta_title.clone()),
        "meta_description" => Some(doc.meta_description.clone()),
        _ => None,
    }
}
