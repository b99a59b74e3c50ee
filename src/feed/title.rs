//! Item titles from the first paragraph of a post.

use std::ops::ControlFlow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::richtext::RichNode;

/// One or more sentence terminators followed by whitespace.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s").expect("Invalid regex"));

/// Derive a title of roughly `max_length` characters from rich text.
///
/// Only text before the first line break counts. Longer text is cut after the
/// last sentence that ends within `max_length`, or else after the first
/// sentence that ends beyond it. Text with no sentence boundary is left whole.
#[must_use]
pub fn derive_title(nodes: &[RichNode], max_length: usize) -> String {
    let text = first_paragraph(nodes);
    truncate_at_sentence(text.trim(), max_length).to_string()
}

/// Text in document order up to the first `<br>`.
#[must_use]
pub fn first_paragraph(nodes: &[RichNode]) -> String {
    let mut out = String::new();
    let _ = collect_until_break(nodes, &mut out);
    out
}

fn collect_until_break(nodes: &[RichNode], out: &mut String) -> ControlFlow<()> {
    for node in nodes {
        match node {
            RichNode::Text(text) => out.push_str(text),
            RichNode::Element(el) if el.is_line_break() => return ControlFlow::Break(()),
            RichNode::Element(el) => {
                if collect_until_break(&el.children, out).is_break() {
                    return ControlFlow::Break(());
                }
            }
            RichNode::Comment(_) => {}
        }
    }
    ControlFlow::Continue(())
}

fn truncate_at_sentence(text: &str, max_length: usize) -> &str {
    if text.chars().count() <= max_length {
        return text;
    }

    let mut last_in_range = None;
    let mut first_beyond = None;
    for m in SENTENCE_END.find_iter(text) {
        if m.start() == 0 {
            continue;
        }
        // Keep the terminator run, drop the whitespace after it
        let cut = m.start() + m.as_str().trim_end().len();
        if text[..cut].chars().count() <= max_length {
            last_in_range = Some(cut);
        } else {
            first_beyond = Some(cut);
            break;
        }
    }

    match last_in_range.or(first_beyond) {
        Some(cut) => &text[..cut],
        None => text,
    }
}
