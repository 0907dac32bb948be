//! Markdown processing utilities.
//!
//! Uses pulldown-cmark for CommonMark parsing. Article drafts usually arrive as
//! markdown; the analyzers want prose, with headings kept because they carry
//! keywords.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// HTML heading tags (`<h1>` through `<h6>`).
static HTML_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h[1-6][\s>]").expect("valid regex"));

/// Strip markdown formatting, returning plain prose.
///
/// Removes code blocks, inline code, HTML, YAML frontmatter, and link
/// targets. Heading text is kept as its own paragraph. Every block ends
/// with a blank line so sentence splitting sees block boundaries.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn strip_to_prose(text: &str) -> String {
    let text = strip_frontmatter(text);

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options);

    let mut result = String::with_capacity(text.len());
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) if !in_code_block => result.push_str(&t),
            Event::SoftBreak | Event::HardBreak if !in_code_block => result.push(' '),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableRow,
            ) => result.push_str("\n\n"),
            _ => {}
        }
    }

    result.trim_end().to_string()
}

/// Byte ranges of the prose text in a markdown document.
///
/// Covers paragraph, heading, list and table text, including link text.
/// Frontmatter, code (fenced, indented or inline), HTML and link targets are
/// never inside a range. Adjacent text runs are merged so phrases split by
/// the parser stay whole.
pub fn prose_ranges(text: &str) -> Vec<Range<usize>> {
    let body = strip_frontmatter(text);
    let offset = text.len() - body.len();

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut in_code_block = false;

    for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(_) | Event::SoftBreak if !in_code_block => {
                let range = range.start + offset..range.end + offset;
                match ranges.last_mut() {
                    Some(last) if last.end == range.start => last.end = range.end,
                    _ => ranges.push(range),
                }
            }
            _ => {}
        }
    }

    ranges
}

/// Extract headings from markdown text.
///
/// Returns a list of `(level, text)` pairs where level is 1-6.
pub fn extract_headings(text: &str) -> Vec<(u8, String)> {
    let text = strip_frontmatter(text);
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES);

    let mut headings = Vec::new();
    let mut in_heading: Option<u8> = None;
    let mut heading_text = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = Some(level as u8);
                heading_text.clear();
            }
            Event::Text(t) | Event::Code(t) if in_heading.is_some() => {
                heading_text.push_str(&t);
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = in_heading.take() {
                    headings.push((level, heading_text.clone()));
                }
            }
            _ => {}
        }
    }

    headings
}

/// Whether the content carries any heading markers, markdown or HTML.
pub fn has_headings(text: &str) -> bool {
    HTML_HEADING.is_match(text) || !extract_headings(text).is_empty()
}

/// Drop a leading YAML frontmatter block, if present.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close_pos) = after_opening.find("\n---") else {
        return text;
    };
    let remainder = &after_opening[close_pos + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}
