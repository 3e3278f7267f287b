//! HTML export of word diffs. Document text is untrusted, so every token is
//! escaped before it is wrapped in markup.

use crate::diff::{DiffResult, DiffTag};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders tokens separated by single spaces. Inserted words become
/// `<span class="diff-add">`, deleted words `<span class="diff-remove">`.
pub fn diff_to_html(result: &DiffResult) -> String {
    result
        .tokens
        .iter()
        .map(|token| {
            let text = escape(&token.text);
            match token.tag {
                DiffTag::Unchanged => text,
                DiffTag::Inserted => format!(r#"<span class="diff-add">{text}</span>"#),
                DiffTag::Deleted => format!(r#"<span class="diff-remove">{text}</span>"#),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
