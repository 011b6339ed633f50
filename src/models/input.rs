use base64::Engine;
use serde::{Deserialize, Serialize};

use super::content::{ContentType, LanguageStyle};

/// Image formats the upload field accepts.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    pub base64: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInput {
    pub content_type: ContentType,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_details: String,
    #[serde(default)]
    pub image: Option<ImageInput>,
    #[serde(default)]
    pub language_style: LanguageStyle,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("Please provide a Product Source URL, or Product Name, Details, or an Image to generate content.")]
    NothingToGenerate,
    #[error("The Product Source URL is not a valid http(s) address: {0}")]
    InvalidSourceUrl(String),
    #[error("Unsupported image type: {0} (use PNG, JPEG or WebP)")]
    UnsupportedImageType(String),
    #[error("The uploaded image could not be read.")]
    InvalidImageData,
}

impl GenerateInput {
    /// Trimmed source URL, `None` when blank.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(raw) = self.source_url() {
            match url::Url::parse(raw) {
                Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
                _ => return Err(InputError::InvalidSourceUrl(raw.to_string())),
            }
        }

        if let Some(ref img) = self.image {
            if !ALLOWED_IMAGE_TYPES.contains(&img.mime_type.as_str()) {
                return Err(InputError::UnsupportedImageType(img.mime_type.clone()));
            }
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(img.base64.trim())
                .map_err(|_| InputError::InvalidImageData)?;
            if decoded.is_empty() {
                return Err(InputError::InvalidImageData);
            }
        }

        if self.source_url().is_none()
            && self.product_name.trim().is_empty()
            && self.product_details.trim().is_empty()
            && self.image.is_none()
        {
            return Err(InputError::NothingToGenerate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> GenerateInput {
        GenerateInput {
            content_type: ContentType::Website,
            product_name: String::new(),
            product_details: String::new(),
            image: None,
            language_style: LanguageStyle::default(),
            source_url: None,
        }
    }

    #[test]
    fn requires_some_source() {
        assert_eq!(input().validate(), Err(InputError::NothingToGenerate));

        let mut i = input();
        i.product_details = "Gentle cleanser".into();
        assert!(i.validate().is_ok());

        let mut i = input();
        i.source_url = Some("https://example.com/p/1".into());
        assert!(i.validate().is_ok());
    }

    #[test]
    fn blank_url_is_absent() {
        let mut i = input();
        i.source_url = Some("   ".into());
        assert_eq!(i.source_url(), None);
        assert_eq!(i.validate(), Err(InputError::NothingToGenerate));
    }

    #[test]
    fn rejects_non_http_url() {
        let mut i = input();
        i.source_url = Some("ftp://example.com".into());
        assert!(matches!(i.validate(), Err(InputError::InvalidSourceUrl(_))));
        i.source_url = Some("not a url".into());
        assert!(matches!(i.validate(), Err(InputError::InvalidSourceUrl(_))));
    }

    #[test]
    fn image_checks() {
        let mut i = input();
        i.image = Some(ImageInput {
            base64: "iVBORw0KGgo=".into(),
            mime_type: "image/png".into(),
        });
        assert!(i.validate().is_ok());

        i.image = Some(ImageInput {
            base64: "iVBORw0KGgo=".into(),
            mime_type: "image/gif".into(),
        });
        assert!(matches!(i.validate(), Err(InputError::UnsupportedImageType(_))));

        i.image = Some(ImageInput {
            base64: "%%%".into(),
            mime_type: "image/jpeg".into(),
        });
        assert_eq!(i.validate(), Err(InputError::InvalidImageData));
    }

    #[test]
    fn deserializes_with_defaults() {
        let i: GenerateInput =
            serde_json::from_str(r#"{"contentType":"social","productName":"Toner"}"#).unwrap();
        assert_eq!(i.content_type, ContentType::Social);
        assert_eq!(i.language_style, LanguageStyle::Banglish);
        assert!(i.validate().is_ok());
    }
}
