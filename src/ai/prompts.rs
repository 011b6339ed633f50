use std::collections::HashMap;

use crate::models::content::LanguageStyle;
use crate::models::input::GenerateInput;

const NOT_PROVIDED: &str = "(Not explicitly provided by user)";
/// Below these trimmed lengths, a source URL becomes the primary information source.
const SPARSE_NAME_LEN: usize = 5;
const SPARSE_DETAILS_LEN: usize = 20;

/// Shop identity woven into social posts.
#[derive(Debug, Clone)]
pub struct ShopProfile {
    pub name: String,
    pub url: String,
}

impl ShopProfile {
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        Self {
            name: settings
                .get("shop_name")
                .cloned()
                .unwrap_or_else(|| "Finesse Glow".to_string()),
            url: settings
                .get("shop_url")
                .cloned()
                .unwrap_or_else(|| "https://finesseglow.com/".to_string()),
        }
    }
}

/// True when the URL must stand in for missing name and details.
pub fn url_is_primary(input: &GenerateInput) -> bool {
    input.source_url().is_some()
        && input.product_name.trim().chars().count() < SPARSE_NAME_LEN
        && input.product_details.trim().chars().count() < SPARSE_DETAILS_LEN
}

fn quoted_or_missing(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        format!("\"{}\"", value)
    }
}

/// Name and details lines, pointing at the URL when it is the primary source.
fn product_lines(input: &GenerateInput) -> (String, String) {
    match input.source_url() {
        Some(url) if url_is_primary(input) => (
            format!(
                "(Attempt to determine from URL: {}. If provided by user: \"{}\")",
                url, input.product_name
            ),
            format!(
                "(Attempt to determine from URL: {}. If provided by user: \"{}\")",
                url, input.product_details
            ),
        ),
        _ => (
            quoted_or_missing(&input.product_name),
            quoted_or_missing(&input.product_details),
        ),
    }
}

fn primary_url_block(url: &str, extract: &str, target: &str, failure_field: &str) -> String {
    format!(
        "CRITICAL INSTRUCTION: The user has provided a Product Source URL (\"{url}\") and minimal or no other product details.\n\
         Your primary task is to:\n\
         1. Attempt to access and thoroughly analyze the content of this URL: \"{url}\".\n\
         2. From the URL's content, extract {extract}.\n\
         3. Use THIS EXTRACTED INFORMATION as the main source to generate all sections of the {target} JSON.\n\
         4. If an image is also provided, use it as visual context to supplement or verify information from the URL.\n\
         5. If the Product Name field below is marked \"{NOT_PROVIDED}\", you MUST determine it from the URL.\n\
         6. If you CANNOT access the URL, or it does not contain product information, you MUST still generate a valid JSON structure. \
         In that case clearly state in {failure_field} that information could not be retrieved from the URL, \
         then generate generic but plausible K-Beauty content if an image is available, or placeholder content otherwise.\n\
         This URL-based extraction is paramount for this request."
    )
}

fn source_instruction(input: &GenerateInput, primary: String, context: String) -> String {
    match input.source_url() {
        Some(_) if url_is_primary(input) => primary,
        Some(_) => context,
        None => String::new(),
    }
}

fn image_line(input: &GenerateInput, with_image: &str) -> String {
    if input.image.is_some() {
        with_image.to_string()
    } else {
        "No product image provided.".to_string()
    }
}

// ── Website SEO copy ──────────────────────────────────

pub fn website_system() -> String {
    "You are an expert SEO copywriter and K-Beauty enthusiast specializing in Korean beauty products. \
     Your goal is to generate a comprehensive, engaging, and SEO-optimized product description. \
     The output MUST be a valid JSON object. Do not include any text outside the JSON object, including markdown fences."
        .to_string()
}

pub fn website(input: &GenerateInput) -> String {
    let url = input.source_url().unwrap_or_default();
    let source = source_instruction(
        input,
        primary_url_block(
            url,
            "the full product name, brand, key features, benefits, usage instructions, suitable skin types/concerns, origin (if available), and any other relevant product information",
            "product description",
            "the introductory paragraph of \"seoDescription\"",
        ),
        format!(
            "A Product Source URL (\"{}\") has been provided for additional context. If accessible, use its content to enrich \
             and supplement the details provided below. If there's a conflict, prioritize explicitly provided details unless they are very sparse.",
            url
        ),
    );
    let (name, details) = product_lines(input);
    let image = image_line(
        input,
        "An image of the product/packaging is also provided. Use visual information from the image (text on packaging, \
         product appearance, branding) to supplement, verify, or assist in extracting details.",
    );

    format!(
        "{source}\n\n\
         User Provided Inputs:\n\
         Product Name: {name}\n\
         Product Details: {details}\n\
         {image}\n\n\
         Based on ALL available information, generate the following JSON structure:\n\
         {{\n\
           \"productTitle\": \"string (Full product name, potentially enhanced for SEO, e.g. 'Brand Product - Key Benefit')\",\n\
           \"seoDescription\": [\n\
             {{ \"type\": \"paragraph\", \"content\": \"string (Introductory paragraph: what the product is, main purpose, key benefits)\" }},\n\
             {{ \"type\": \"heading\", \"level\": 2, \"content\": \"Key Features\" }},\n\
             {{ \"type\": \"paragraph\", \"content\": \"string (Key features as bullet points formatted as '\\n- Feature Name: Description.')\" }},\n\
             {{ \"type\": \"heading\", \"level\": 2, \"content\": \"Benefits\" }},\n\
             {{ \"type\": \"paragraph\", \"content\": \"string (3-5 clear benefits as bullet points formatted as '\\n- Benefit statement.')\" }},\n\
             {{ \"type\": \"heading\", \"level\": 2, \"content\": \"How to Use\" }},\n\
             {{ \"type\": \"paragraph\", \"content\": \"string (Clear, step-by-step usage instructions.)\" }},\n\
             {{ \"type\": \"heading\", \"level\": 2, \"content\": \"Suitable For\" }},\n\
             {{ \"type\": \"paragraph\", \"content\": \"string (Skin types and concerns this product addresses.)\" }},\n\
             {{ \"type\": \"heading\", \"level\": 2, \"content\": \"Origin\" }},\n\
             {{ \"type\": \"paragraph\", \"content\": \"string (e.g. 'Made in Korea'. If not found, state 'Origin not specified' or omit heading & paragraph.)\" }}\n\
           ],\n\
           \"h1Headings\": [\"string (3-5 compelling H1 headings)\"],\n\
           \"broadMatchKeywords\": [\"string (5-10 broad match SEO keywords)\"],\n\
           \"metaTitle\": \"string (50-60 characters, product name + primary benefit)\",\n\
           \"metaDescription\": \"string (150-160 characters, summarize benefits, encourage clicks, include product name)\"\n\
         }}\n\n\
         General Guidelines:\n\
         - Adopt a friendly, informative, slightly playful K-Beauty tone. Vary sentence structure; avoid robotic phrasing.\n\
         - All string values in JSON must be properly escaped.\n\
         - \"seoDescription\" must follow the specified sequence.\n\
         - Bullet points within paragraph content strings MUST use the '\\n- ' prefix.\n\
         - If information for a section is unavailable, create sensible placeholders or say so. Do not leave productTitle empty if it can be derived.\n\
         - If URL extraction fails and no other details are present, make it clear this is placeholder content."
    )
}

// ── Social media post ─────────────────────────────────

pub fn social_system(shop: &ShopProfile) -> String {
    format!(
        "You are a creative social media manager for \"{}\", skilled at crafting captivating K-Beauty posts. \
         The output MUST be a valid JSON object. Do not include any text outside the JSON object (no markdown fences).",
        shop.name
    )
}

pub fn language_instruction(style: LanguageStyle) -> &'static str {
    match style {
        LanguageStyle::English => {
            "Generate the content strictly in English. All text fields (title, intro, sections, callToAction) must be in English. Use emojis extensively."
        }
        LanguageStyle::Bengali => {
            "Generate the content strictly in Bengali (বাংলা). All text fields must be in Bengali. Use emojis extensively."
        }
        LanguageStyle::Banglish => {
            "Generate the content in a mix of Bengali and English (Banglish). Ensure a good balance. Use emojis extensively."
        }
    }
}

pub fn social(input: &GenerateInput, shop: &ShopProfile) -> String {
    let url = input.source_url().unwrap_or_default();
    let source = source_instruction(
        input,
        primary_url_block(
            url,
            "the full product name, brand, key selling points, and any visually appealing aspects or benefits suitable for a social media post",
            "social media post",
            "the \"intro\"",
        ),
        format!(
            "A Product Source URL (\"{}\") has been provided for additional context. If accessible, use its content to find \
             engaging points and details to enrich the post based on the explicit details provided below.",
            url
        ),
    );
    let (name, details) = product_lines(input);
    let image = image_line(
        input,
        "An image of the product is also provided. Use its visual cues (packaging, texture, overall vibe) to enhance the \
         post's appeal and assist in deriving information if other sources are sparse.",
    );
    let style = input.language_style.name();
    let language = language_instruction(input.language_style);
    let shop_name = &shop.name;
    let shop_url = &shop.url;

    format!(
        "{source}\n\n\
         User Provided Inputs:\n\
         Product Name: {name}\n\
         Product Details: {details}\n\
         Selected Language Style: \"{style}\" ({language})\n\
         {image}\n\n\
         Key Requirements:\n\
         1. Shop Name: Naturally integrate \"{shop_name}\" (e.g. in intro or closing).\n\
         2. Website: 'callToAction' MUST include \"{shop_url}\".\n\
         3. Hashtags: ALL hashtags MUST be in ENGLISH, relevant to K-Beauty and the product (e.g. #SkincareRoutine, #KBeautyFinds).\n\n\
         Follow this JSON structure:\n\
         {{\n\
           \"title\": \"string (Product name with relevant emojis, language per Selected Language Style)\",\n\
           \"intro\": \"string (Engaging intro, 2-3 lines, mention '{shop_name}')\",\n\
           \"keyBenefitsSection\": \"string (Optional. '💎 Key Benefits' heading + bullet points '✔️ Benefit 1...')\",\n\
           \"keyIngredientsSection\": \"string (Optional. '🌿 Key Ingredients' heading + '🌱 Ingredient 1...')\",\n\
           \"howToUseSection\": \"string (Optional. '📌 How to Use' heading + numbered steps)\",\n\
           \"closingStatement\": \"string (Optional. Catchy closing, mention '{shop_name}')\",\n\
           \"callToAction\": \"string (Call to action, MUST include '{shop_url}')\",\n\
           \"hashtags\": [\"string (5-10 ENGLISH hashtags)\"]\n\
         }}\n\n\
         Omit optional sections (empty string or no key) if not supported by available info.\n\
         Ensure valid JSON (escape newlines with \\n). Tone: upbeat, friendly, persuasive.\n\
         If URL extraction fails and no other details are present, make it clear this is placeholder content."
    )
}
