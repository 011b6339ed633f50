use serde::Serialize;

use crate::models::content::DescriptionBlock;

/// One displayable piece of a rendered description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fragment {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
}

/// Line accumulator for a paragraph block. Only one buffer is open at a time.
enum LineState {
    Idle,
    AccumulatingParagraph(Vec<String>),
    AccumulatingList(Vec<String>),
}

impl LineState {
    fn flush(&mut self, out: &mut Vec<Fragment>) {
        match std::mem::replace(self, LineState::Idle) {
            LineState::Idle => {}
            LineState::AccumulatingParagraph(lines) => out.push(Fragment::Paragraph {
                text: lines.join(" ").trim().to_string(),
            }),
            LineState::AccumulatingList(items) => out.push(Fragment::List { items }),
        }
    }

    fn push_bullet(&mut self, item: String, out: &mut Vec<Fragment>) {
        if let LineState::AccumulatingList(items) = self {
            items.push(item);
            return;
        }
        self.flush(out);
        *self = LineState::AccumulatingList(vec![item]);
    }

    fn push_text(&mut self, line: String, out: &mut Vec<Fragment>) {
        if let LineState::AccumulatingParagraph(lines) = self {
            lines.push(line);
            return;
        }
        self.flush(out);
        *self = LineState::AccumulatingParagraph(vec![line]);
    }
}

/// Returns the bullet text if the (already trimmed) line is a `"- "` item.
fn bullet_item(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix("- ").map(str::trim)
}

/// Split a paragraph block's content into paragraph and list fragments.
pub fn paragraph_fragments(content: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut state = LineState::Idle;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if let Some(item) = bullet_item(trimmed) {
            state.push_bullet(item.to_string(), &mut out);
        } else if trimmed.is_empty() {
            state.flush(&mut out);
        } else {
            state.push_text(trimmed.to_string(), &mut out);
        }
    }
    state.flush(&mut out);
    out
}

/// Screen view of a description: headings, paragraphs and lists in input order.
pub fn render_fragments(blocks: &[DescriptionBlock]) -> Vec<Fragment> {
    let mut out = Vec::new();
    for block in blocks {
        if block.is_heading() {
            out.push(Fragment::Heading {
                level: block.heading_level(),
                text: block.content.clone(),
            });
        } else {
            out.extend(paragraph_fragments(&block.content));
        }
    }
    out
}

/// HTML snippet for a description. All text content is escaped.
pub fn to_html(blocks: &[DescriptionBlock]) -> String {
    let mut html = String::new();
    for fragment in render_fragments(blocks) {
        match fragment {
            Fragment::Heading { level, text } => {
                html.push_str(&format!("<h{}>{}</h{}>\n", level, html_escape(&text), level));
            }
            Fragment::Paragraph { text } => {
                html.push_str(&format!("<p>{}</p>\n", html_escape(&text)));
            }
            Fragment::List { items } => {
                html.push_str("<ul>\n");
                for item in &items {
                    html.push_str(&format!("  <li>{}</li>\n", html_escape(item)));
                }
                html.push_str("</ul>\n");
            }
        }
    }
    html.trim().to_string()
}

/// Escapes `& < > " '`. Not idempotent: `&amp;` becomes `&amp;amp;`.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
