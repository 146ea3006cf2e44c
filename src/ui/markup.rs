use regex::Regex;
use std::sync::LazyLock;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

static HIDDEN_ELEMENTS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b.*?</(script|style)\s*>").ok());
static LINE_BREAKS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<br\s*/?>|</(p|div|tr|table|ul|ol|dl|dt|dd|pre|blockquote|section|article|h[1-6])\s*>|<(p|div|table|h[1-6])\b[^>]*>",
    )
    .ok()
});
static LIST_ITEMS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").ok());
static TAGS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());
static SPACES: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[ \t\r\f]+").ok());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&ndash;", "–"),
    ("&mdash;", "—"),
    ("&deg;", "°"),
    // must stay last so "&amp;lt;" decodes to "&lt;"
    ("&amp;", "&"),
];

fn replace_all(pattern: &LazyLock<Option<Regex>>, text: &str, replacement: &str) -> String {
    match pattern.as_ref() {
        Some(regex) => regex.replace_all(text, replacement).into_owned(),
        None => text.to_string(),
    }
}

/// Converts server-rendered block HTML into plain text lines for the terminal.
pub fn html_to_text(html: &str) -> Vec<String> {
    let text = replace_all(&HIDDEN_ELEMENTS, html, "");
    let text = replace_all(&LIST_ITEMS, &text, "\n• ");
    let text = replace_all(&LINE_BREAKS, &text, "\n");
    let mut text = replace_all(&TAGS, &text, "");
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }

    let mut lines: Vec<String> = Vec::new();
    for raw_line in text.lines() {
        let line = replace_all(&SPACES, raw_line, " ").trim().to_string();
        let previous_blank = lines.last().is_none_or(String::is_empty);
        if line.is_empty() && previous_blank {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Breaks text lines at spaces so none is wider than `max_width` columns.
/// Words longer than a whole line are split between characters.
pub fn wrap_lines(lines: &[String], max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut wrapped = Vec::with_capacity(lines.len());

    for line in lines {
        let mut current = String::new();
        let mut width = 0usize;

        for word in line.split(' ') {
            let word_width = UnicodeWidthStr::width(word);
            if width > 0 && width + 1 + word_width > max_width {
                wrapped.push(std::mem::take(&mut current));
                width = 0;
            }
            if width > 0 {
                current.push(' ');
                width += 1;
            }
            for character in word.chars() {
                let char_width = UnicodeWidthChar::width(character).unwrap_or(0);
                if width > 0 && width + char_width > max_width {
                    wrapped.push(std::mem::take(&mut current));
                    width = 0;
                }
                current.push(character);
                width += char_width;
            }
        }
        wrapped.push(current);
    }
    wrapped
}
