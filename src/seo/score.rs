use serde::Serialize;

use crate::models::content::SeoDocument;

/// A section the generator is asked to produce, and how long its body must be.
#[derive(Debug, Clone)]
pub struct SectionRule {
    pub heading: &'static str,
    pub min_content_len: usize,
}

/// Heuristic weights and thresholds for [`score_with`].
#[derive(Debug, Clone)]
pub struct ScoringRules {
    pub title_min_len: usize,
    pub title_points: f64,
    pub opening_min_len: usize,
    pub opening_points: f64,
    pub sections: Vec<SectionRule>,
    pub section_points: f64,
    pub structure_cap: f64,
    pub h1_points_each: f64,
    pub h1_cap: f64,
    pub keyword_points_each: f64,
    pub keyword_cap: f64,
    pub meta_title_range: (usize, usize),
    pub meta_description_range: (usize, usize),
    pub meta_ideal_points: f64,
    pub meta_present_points: f64,
    pub body_keyword_min_len: usize,
    pub body_keyword_points: f64,
    pub bulleted_sections: Vec<&'static str>,
    pub bullet_points: f64,
    pub max_score: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            title_min_len: 5,
            title_points: 10.0,
            opening_min_len: 20,
            opening_points: 5.0,
            sections: vec![
                SectionRule { heading: "Key Features", min_content_len: 10 },
                SectionRule { heading: "Benefits", min_content_len: 10 },
                SectionRule { heading: "How to Use", min_content_len: 10 },
                SectionRule { heading: "Suitable For", min_content_len: 10 },
                SectionRule { heading: "Origin", min_content_len: 5 },
            ],
            section_points: 4.0,
            structure_cap: 25.0,
            h1_points_each: 2.0,
            h1_cap: 10.0,
            keyword_points_each: 1.0,
            keyword_cap: 10.0,
            meta_title_range: (40, 65),
            meta_description_range: (100, 165),
            meta_ideal_points: 15.0,
            meta_present_points: 5.0,
            body_keyword_min_len: 3,
            body_keyword_points: 10.0,
            bulleted_sections: vec!["Key Features", "Benefits"],
            bullet_points: 2.5,
            max_score: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl ScoreLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeoScore {
    pub score: u8,
    pub label: ScoreLabel,
}

pub fn score(doc: &SeoDocument) -> SeoScore {
    score_with(doc, &ScoringRules::default())
}

pub fn score_with(doc: &SeoDocument, rules: &ScoringRules) -> SeoScore {
    let value = raw_score(doc, rules);
    SeoScore {
        score: value,
        label: ScoreLabel::from_score(value),
    }
}

/// Length in UTF-16 code units, so an emoji counts as two.
fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// The paragraph right after the first heading containing `heading`, if any.
fn section_body<'a>(doc: &'a SeoDocument, heading: &str) -> Option<&'a str> {
    let idx = doc
        .sections
        .iter()
        .position(|b| b.is_heading() && b.content.contains(heading))?;
    let next = doc.sections.get(idx + 1)?;
    next.is_paragraph().then_some(next.content.as_str())
}

fn meta_points(text: &str, (lo, hi): (usize, usize), rules: &ScoringRules) -> f64 {
    let len = text_len(text);
    if (lo..=hi).contains(&len) {
        rules.meta_ideal_points
    } else if len > 0 {
        rules.meta_present_points
    } else {
        0.0
    }
}

fn raw_score(doc: &SeoDocument, rules: &ScoringRules) -> u8 {
    if doc.sections.is_empty() {
        return 0;
    }

    let mut score = 0.0;

    if text_len(&doc.product_title) > rules.title_min_len {
        score += rules.title_points;
    }

    // Structure
    let mut structure = 0.0;
    let opening = &doc.sections[0];
    if opening.is_paragraph() && text_len(opening.content.trim()) > rules.opening_min_len {
        structure += rules.opening_points;
    }
    for section in &rules.sections {
        if let Some(body) = section_body(doc, section.heading) {
            if text_len(body.trim()) > section.min_content_len {
                structure += rules.section_points;
            }
        }
    }
    score += f64::min(structure, rules.structure_cap);

    score += f64::min(doc.h1_headings.len() as f64 * rules.h1_points_each, rules.h1_cap);
    score += f64::min(
        doc.broad_match_keywords.len() as f64 * rules.keyword_points_each,
        rules.keyword_cap,
    );

    score += meta_points(&doc.meta_title, rules.meta_title_range, rules);
    score += meta_points(&doc.meta_description, rules.meta_description_range, rules);

    let body = doc
        .sections
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let title = doc.product_title.to_lowercase();
    if title
        .split(' ')
        .any(|word| text_len(word) > rules.body_keyword_min_len && body.contains(word))
    {
        score += rules.body_keyword_points;
    }

    for heading in &rules.bulleted_sections {
        if section_body(doc, heading).is_some_and(|b| b.contains("\n- ")) {
            score += rules.bullet_points;
        }
    }

    f64::min(score.round(), rules.max_score).max(0.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::DescriptionBlock;

    fn empty_doc() -> SeoDocument {
        SeoDocument {
            product_title: String::new(),
            sections: vec![],
            h1_headings: vec![],
            broad_match_keywords: vec![],
            meta_title: String::new(),
            meta_description: String::new(),
        }
    }

    fn full_doc() -> SeoDocument {
        SeoDocument {
            product_title: "COSRX Advanced Snail 96 Mucin Power Essence".into(),
            sections: vec![
                DescriptionBlock::paragraph(
                    "This snail essence is a lightweight, hydrating treatment for dull skin.",
                ),
                DescriptionBlock::heading("Key Features", 2),
                DescriptionBlock::paragraph("\n- 96% snail secretion filtrate\n- Fragrance-free"),
                DescriptionBlock::heading("Benefits", 2),
                DescriptionBlock::paragraph("\n- Deep hydration\n- Repairs the barrier"),
                DescriptionBlock::heading("How to Use", 2),
                DescriptionBlock::paragraph("Apply after toner and pat gently."),
                DescriptionBlock::heading("Suitable For", 2),
                DescriptionBlock::paragraph("All skin types, especially dry skin."),
                DescriptionBlock::heading("Origin", 2),
                DescriptionBlock::paragraph("Made in Korea"),
            ],
            h1_headings: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            broad_match_keywords: (0..10).map(|i| format!("kw{}", i)).collect(),
            meta_title: "x".repeat(50),
            meta_description: "y".repeat(150),
        }
    }

    #[test]
    fn empty_sections_score_zero() {
        let mut doc = full_doc();
        doc.sections.clear();
        assert_eq!(score(&doc).score, 0);
        assert_eq!(score(&empty_doc()).score, 0);
        assert_eq!(score(&doc).label, ScoreLabel::NeedsImprovement);
    }

    #[test]
    fn complete_document_scores_full() {
        // 10 + 25 + 10 + 10 + 15 + 15 + 10 + 5 = 100
        let s = score(&full_doc());
        assert_eq!(s.score, 100);
        assert_eq!(s.label, ScoreLabel::Excellent);
    }

    #[test]
    fn lengths_count_utf16_units() {
        let mut doc = full_doc();
        doc.meta_title.clear();
        doc.h1_headings.clear();
        let before = score(&doc).score;

        // 38 letters + one emoji = 40 units: inside the ideal range.
        doc.meta_title = format!("{}🌸", "a".repeat(38));
        assert_eq!(score(&doc).score, before + 15);

        // 37 letters + one emoji = 39 units: present but short.
        doc.meta_title = format!("{}🌸", "a".repeat(37));
        assert_eq!(score(&doc).score, before + 5);
    }

    #[test]
    fn meta_title_of_fifty_adds_fifteen() {
        let mut doc = full_doc();
        doc.meta_title.clear();
        doc.h1_headings.clear(); // keep the total under the cap
        let before = score(&doc).score;
        doc.meta_title = "m".repeat(50);
        assert_eq!(score(&doc).score, before + 15);
    }

    #[test]
    fn meta_lengths_outside_range_earn_five() {
        let mut doc = empty_doc();
        doc.sections = vec![DescriptionBlock::heading("Nothing", 2)];
        doc.meta_title = "short".into();
        doc.meta_description = "z".repeat(166);
        assert_eq!(score(&doc).score, 10);
        doc.meta_title = "t".repeat(40);
        doc.meta_description = "d".repeat(100);
        assert_eq!(score(&doc).score, 30);
    }

    #[test]
    fn key_features_and_benefits_structure_arithmetic() {
        let mut doc = empty_doc();
        doc.sections = vec![
            DescriptionBlock::heading("Key Features", 2),
            DescriptionBlock::paragraph("Long enough body text"),
            DescriptionBlock::heading("Benefits", 2),
            DescriptionBlock::paragraph("Also long enough text"),
        ];
        // No opening paragraph: 4 + 4 structure, nothing else.
        assert_eq!(score(&doc).score, 8);

        doc.sections
            .insert(0, DescriptionBlock::paragraph("An opening paragraph over twenty chars."));
        assert_eq!(score(&doc).score, 13);
    }

    #[test]
    fn heading_match_is_substring_and_case_sensitive() {
        let mut doc = empty_doc();
        doc.sections = vec![
            DescriptionBlock::heading("Our Key Features Today", 2),
            DescriptionBlock::paragraph("Long enough body text"),
            DescriptionBlock::heading("benefits", 2),
            DescriptionBlock::paragraph("Also long enough text"),
        ];
        assert_eq!(score(&doc).score, 4);
    }

    #[test]
    fn no_lookahead_past_next_block() {
        let mut doc = empty_doc();
        doc.sections = vec![
            DescriptionBlock::heading("Origin", 2),
            DescriptionBlock::heading("Sub", 3),
            DescriptionBlock::paragraph("Made in Korea"),
        ];
        assert_eq!(score(&doc).score, 0);
    }

    #[test]
    fn origin_uses_lower_threshold() {
        let mut doc = empty_doc();
        doc.sections = vec![
            DescriptionBlock::heading("Origin", 2),
            DescriptionBlock::paragraph("Korea!"),
        ];
        assert_eq!(score(&doc).score, 4);
        doc.sections[1].content = "Korea".into();
        assert_eq!(score(&doc).score, 0);
    }

    #[test]
    fn structure_is_capped() {
        let rules = ScoringRules {
            structure_cap: 6.0,
            ..ScoringRules::default()
        };
        let mut doc = empty_doc();
        doc.sections = vec![
            DescriptionBlock::heading("Key Features", 2),
            DescriptionBlock::paragraph("Long enough body text"),
            DescriptionBlock::heading("Benefits", 2),
            DescriptionBlock::paragraph("Also long enough text"),
        ];
        assert_eq!(score_with(&doc, &rules).score, 6);
    }

    #[test]
    fn counts_are_capped() {
        let mut doc = empty_doc();
        doc.sections = vec![DescriptionBlock::heading("H", 2)];
        doc.h1_headings = (0..20).map(|i| i.to_string()).collect();
        doc.broad_match_keywords = (0..3).map(|i| i.to_string()).collect();
        assert_eq!(score(&doc).score, 13);
    }

    #[test]
    fn title_word_in_body() {
        let mut doc = empty_doc();
        doc.product_title = "Snail Cream".into();
        doc.sections = vec![DescriptionBlock::heading("All about SNAIL care", 2)];
        // 10 for the title length, 10 for "snail" in the body
        assert_eq!(score(&doc).score, 20);

        doc.product_title = "Ab Cd Efg".into();
        doc.sections = vec![DescriptionBlock::heading("ab cd efg", 2)];
        assert_eq!(score(&doc).score, 10);
    }

    #[test]
    fn bullet_bonus_rounds() {
        let mut doc = empty_doc();
        doc.sections = vec![
            DescriptionBlock::heading("Key Features", 2),
            DescriptionBlock::paragraph("\n- a"),
        ];
        // 2.5 rounds away from zero
        assert_eq!(score(&doc).score, 3);
        doc.sections.push(DescriptionBlock::heading("Benefits", 2));
        doc.sections.push(DescriptionBlock::paragraph("\n- b"));
        assert_eq!(score(&doc).score, 5);
    }

    #[test]
    fn label_boundaries() {
        assert_eq!(ScoreLabel::from_score(100), ScoreLabel::Excellent);
        assert_eq!(ScoreLabel::from_score(90), ScoreLabel::Excellent);
        assert_eq!(ScoreLabel::from_score(89), ScoreLabel::Good);
        assert_eq!(ScoreLabel::from_score(70), ScoreLabel::Good);
        assert_eq!(ScoreLabel::from_score(69), ScoreLabel::Fair);
        assert_eq!(ScoreLabel::from_score(50), ScoreLabel::Fair);
        assert_eq!(ScoreLabel::from_score(49), ScoreLabel::NeedsImprovement);
        assert_eq!(
            serde_json::to_value(ScoreLabel::NeedsImprovement).unwrap(),
            "Needs Improvement"
        );
    }

    #[test]
    fn score_always_in_range() {
        // Deterministic pseudo-random documents of varying shape.
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move |m: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % m
        };
        let headings = ["Key Features", "Benefits", "How to Use", "Suitable For", "Origin", "Misc"];
        for _ in 0..500 {
            let mut doc = empty_doc();
            doc.product_title = "w".repeat(next(30) as usize) + " serum";
            for _ in 0..next(20) {
                if next(2) == 0 {
                    let h = headings[next(headings.len() as u64) as usize];
                    doc.sections.push(DescriptionBlock::heading(h, 2));
                } else {
                    let body = "- item\n".repeat(next(5) as usize) + &"x".repeat(next(60) as usize);
                    doc.sections.push(DescriptionBlock::paragraph(format!("serum {}", body)));
                }
            }
            doc.h1_headings = (0..next(12)).map(|i| i.to_string()).collect();
            doc.broad_match_keywords = (0..next(25)).map(|i| i.to_string()).collect();
            doc.meta_title = "t".repeat(next(120) as usize);
            doc.meta_description = "d".repeat(next(300) as usize);
            let s = score(&doc).score;
            assert!(s <= 100, "score {} out of range", s);
        }
    }
}
