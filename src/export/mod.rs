//! Markdown export of articles.
//!
//! ```text
//! # {title}
//!
//! *Source: {url}*
//! *Language: English*            (or *Original: English | Translated to: French*)
//!
//! ---
//!
//! ## Summary
//! ...
//! ## Full Content
//! ### {section title}            (depth = min(level, 5) + 2)
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{language_name, Article};
use crate::text::split_sections;

/// Characters that are not allowed in file names on common filesystems
fn forbidden_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[<>:"|?*]"#).unwrap_or_else(|e| unreachable!("pattern is valid: {}", e))
    })
}

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s+").unwrap_or_else(|e| unreachable!("pattern is valid: {}", e))
    })
}

/// Options for `render_markdown`
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Target language code when `article` holds translated text
    pub translated_to: Option<String>,
}

/// Render an article as a Markdown document
pub fn render_markdown(article: &Article, options: &ExportOptions) -> String {
    let mut lines = Vec::new();

    lines.push(format!("# {}", article.title));
    lines.push(String::new());
    lines.push(format!("*Source: {}*", article.url));

    let original = language_name(&article.language);
    let language_line = match &options.translated_to {
        Some(target) => format!(
            "*Original: {} | Translated to: {}*",
            original,
            language_name(target)
        ),
        None => format!("*Language: {}*", original),
    };
    lines.push(language_line);
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(article.summary.trim().to_string());
    lines.push(String::new());

    lines.push("## Full Content".to_string());
    lines.push(String::new());

    for section in split_sections(&article.content) {
        if let Some(title) = &section.title {
            let depth = section.level.min(5) + 2;
            lines.push(format!("{} {}", "#".repeat(depth), title));
            lines.push(String::new());
        }

        for paragraph in section.content.split("\n\n") {
            let paragraph = paragraph.trim();
            if !paragraph.is_empty() {
                lines.push(paragraph.to_string());
                lines.push(String::new());
            }
        }
    }

    let mut out = lines.join("\n");
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// File name for an exported article
pub fn download_filename(title: &str, translated_to: Option<&str>) -> String {
    let clean = title.replace(['/', '\\'], "-");
    let clean = forbidden_chars().replace_all(&clean, "");
    let clean = whitespace_runs().replace_all(&clean, "_");

    match translated_to {
        Some(lang) => format!("Wikipedia-{}-translated_to_{}.md", clean, lang),
        None => format!("Wikipedia-{}.md", clean),
    }
}
