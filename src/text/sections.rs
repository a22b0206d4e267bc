//! Splitting plain-text article bodies into titled sections.
//!
//! MediaWiki plain-text extracts keep headings as `== Title ==` lines
//! (more `=` signs for deeper levels). Anything before the first heading
//! is an untitled intro section.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A section of an article body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, `None` for the intro
    pub title: Option<String>,

    /// Section body, trimmed
    pub content: String,

    /// Heading depth: `=` count / 2, 0 for the intro
    pub level: usize,
}

impl Section {
    /// Title to show for the section
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Introduction")
    }
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^(={2,6})[ \t]*(.*?)[ \t]*(={2,6})[ \t]*\r?$")
            .unwrap_or_else(|e| unreachable!("heading pattern is valid: {}", e))
    })
}

/// Split article content into sections
pub fn split_sections(content: &str) -> Vec<Section> {
    // (start of heading line, end of heading line, level, title)
    let headings: Vec<(usize, usize, usize, String)> = heading_pattern()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let open = caps.get(1)?.as_str();
            let close = caps.get(3)?.as_str();
            if open.len() != close.len() {
                return None;
            }
            let title = caps.get(2)?.as_str().trim().to_string();
            Some((whole.start(), whole.end(), open.len(), title))
        })
        .collect();

    if headings.is_empty() {
        return vec![Section {
            title: None,
            content: content.to_string(),
            level: 0,
        }];
    }

    let mut sections = Vec::with_capacity(headings.len() + 1);

    let intro = content[..headings[0].0].trim();
    if !intro.is_empty() {
        sections.push(Section {
            title: None,
            content: intro.to_string(),
            level: 0,
        });
    }

    for (i, (_, heading_end, equals, title)) in headings.iter().enumerate() {
        let body_end = headings
            .get(i + 1)
            .map(|next| next.0)
            .unwrap_or(content.len());

        sections.push(Section {
            title: Some(title.clone()),
            content: content[*heading_end..body_end].trim().to_string(),
            level: equals / 2,
        });
    }

    sections
}
