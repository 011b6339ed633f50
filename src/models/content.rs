use serde::{Deserialize, Serialize};

// ── Selections ────────────────────────────────────────

/// Which shape of copy the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Website,
    Social,
}

impl ContentType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "website" => Some(Self::Website),
            "social" => Some(Self::Social),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Social => "social",
        }
    }
}

/// Language mix for social post text fields. Hashtags stay English regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageStyle {
    English,
    #[default]
    Banglish,
    Bengali,
}

impl LanguageStyle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Banglish => "banglish",
            Self::Bengali => "bengali",
        }
    }
}

// ── SEO document ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
}

pub const DEFAULT_HEADING_LEVEL: u8 = 2;

/// One unit of SEO body text. Paragraph content may carry `"- "` bullet lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl DescriptionBlock {
    pub fn heading(content: impl Into<String>, level: u8) -> Self {
        Self {
            kind: BlockKind::Heading,
            content: content.into(),
            level: Some(level),
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            content: content.into(),
            level: None,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.kind == BlockKind::Heading
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph
    }

    /// Heading level clamped to h2..h6; ignored for paragraphs.
    pub fn heading_level(&self) -> u8 {
        match self.level {
            Some(l @ 2..=6) => l,
            _ => DEFAULT_HEADING_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoDocument {
    pub product_title: String,
    #[serde(rename = "seoDescription")]
    pub sections: Vec<DescriptionBlock>,
    pub h1_headings: Vec<String>,
    pub broad_match_keywords: Vec<String>,
    pub meta_title: String,
    pub meta_description: String,
}

// ── Social post ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub title: String,
    pub intro: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_benefits_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ingredients_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_use_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_statement: Option<String>,
    pub call_to_action: String,
    pub hashtags: Vec<String>,
}

impl SocialPost {
    /// Optional sections in display order, skipping absent or empty ones.
    pub fn present_sections(&self) -> impl Iterator<Item = &str> {
        [
            &self.key_benefits_section,
            &self.key_ingredients_section,
            &self.how_to_use_section,
            &self.closing_statement,
        ]
        .into_iter()
        .filter_map(|s| s.as_deref())
        .filter(|s| !s.is_empty())
    }
}

// ── Tagged result ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum GeneratedContent {
    Seo(SeoDocument),
    Social(SocialPost),
}

impl GeneratedContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Seo(_) => ContentType::Website,
            Self::Social(_) => ContentType::Social,
        }
    }

    pub fn as_seo(&self) -> Option<&SeoDocument> {
        match self {
            Self::Seo(doc) => Some(doc),
            Self::Social(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_defaults_and_clamps() {
        let mut b = DescriptionBlock::heading("Key Features", 3);
        assert_eq!(b.heading_level(), 3);
        b.level = None;
        assert_eq!(b.heading_level(), 2);
        b.level = Some(9);
        assert_eq!(b.heading_level(), 2);
    }

    #[test]
    fn present_sections_skip_empty() {
        let post = SocialPost {
            title: "T".into(),
            intro: "I".into(),
            key_benefits_section: Some("Benefits".into()),
            key_ingredients_section: Some(String::new()),
            how_to_use_section: None,
            closing_statement: Some("Bye".into()),
            call_to_action: "Buy".into(),
            hashtags: vec![],
        };
        let sections: Vec<&str> = post.present_sections().collect();
        assert_eq!(sections, vec!["Benefits", "Bye"]);
    }

    #[test]
    fn generated_content_serializes_tagged() {
        let c = GeneratedContent::Social(SocialPost {
            title: "T".into(),
            intro: "I".into(),
            key_benefits_section: None,
            key_ingredients_section: None,
            how_to_use_section: None,
            closing_statement: None,
            call_to_action: "Buy".into(),
            hashtags: vec!["#a".into()],
        });
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["kind"], "social");
        assert_eq!(v["data"]["callToAction"], "Buy");
        assert_eq!(c.content_type(), ContentType::Social);
    }
}
