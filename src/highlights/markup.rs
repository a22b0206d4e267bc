//! Rendering saved highlights back into article text.

use regex::RegexBuilder;

use super::store::Highlight;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Wrap every occurrence of a highlight in `<mark>` tags.
///
/// Longer highlights win over shorter ones they overlap with. Matching is
/// case-insensitive, keeps the casing of `text`, and only accepts matches
/// not embedded in a larger alphanumeric word.
pub fn apply_highlights(text: &str, highlights: &[Highlight]) -> String {
    if text.is_empty() || highlights.is_empty() {
        return text.to_string();
    }

    let mut needles: Vec<&str> = highlights
        .iter()
        .map(|h| h.text.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    needles.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    needles.dedup();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for needle in needles {
        for range in find_bounded_matches(text, needle) {
            let overlaps = ranges.iter().any(|&(s, e)| range.0 < e && s < range.1);
            if !overlaps {
                ranges.push(range);
            }
        }
    }

    if ranges.is_empty() {
        return text.to_string();
    }
    ranges.sort_unstable();

    let mut out = String::with_capacity(text.len() + ranges.len() * 13);
    let mut cursor = 0;
    for (start, end) in ranges {
        out.push_str(&text[cursor..start]);
        out.push_str(MARK_OPEN);
        out.push_str(&text[start..end]);
        out.push_str(MARK_CLOSE);
        cursor = end;
    }
    out.push_str(&text[cursor..]);

    out
}

/// Case-insensitive matches of `needle` with no ASCII alphanumeric
/// character directly before or after
fn find_bounded_matches(text: &str, needle: &str) -> Vec<(usize, usize)> {
    let pattern = match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut matches = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(m) = pattern.find_at(text, pos) else {
            break;
        };

        let before_ok = !text[..m.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        let after_ok = !text[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric());

        if before_ok && after_ok && m.end() > m.start() {
            matches.push((m.start(), m.end()));
            pos = m.end();
        } else {
            // Retry one character further along
            pos = m.start()
                + text[m.start()..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
        }
    }

    matches
}
