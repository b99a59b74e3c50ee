//! Owned rich-text trees lifted out of parsed channel pages.
//!
//! Scraper documents are not `Send` and cannot be edited in place, so the text
//! fragments a post carries (message body, poll question, reply quote) are
//! copied into this small node model. It only distinguishes text, elements
//! with a tag name and attributes, and comments.

use scraper::{ElementRef, Node};

/// Elements that never have children and render as `<tag />`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in a rich-text tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichNode {
    Text(String),
    Element(RichElement),
    Comment(String),
}

/// An element with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<RichNode>,
}

impl RichElement {
    /// Copy a parsed element and everything below it.
    #[must_use]
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let children = element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(RichNode::Text(String::from(&**text))),
                Node::Comment(comment) => Some(RichNode::Comment(String::from(&**comment))),
                Node::Element(_) => {
                    ElementRef::wrap(child).map(|e| RichNode::Element(Self::from_element(e)))
                }
                _ => None,
            })
            .collect();

        Self {
            name: value.name().to_ascii_lowercase(),
            attrs: value
                .attrs()
                .map(|(name, val)| (name.to_string(), val.to_string()))
                .collect(),
            children,
        }
    }

    /// Element with the given tag name and children, no attributes.
    #[must_use]
    pub fn new(name: &str, children: Vec<RichNode>) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children,
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_line_break(&self) -> bool {
        self.name.eq_ignore_ascii_case("br")
    }

    /// Concatenated text of every descendant text node.
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// HTML of the children, without the element's own tag.
    #[must_use]
    pub fn inner_html(&self) -> String {
        render_html(&self.children)
    }
}

fn collect_text(nodes: &[RichNode], out: &mut String) {
    for node in nodes {
        match node {
            RichNode::Text(text) => out.push_str(text),
            RichNode::Element(el) => collect_text(&el.children, out),
            RichNode::Comment(_) => {}
        }
    }
}

/// Serialize nodes back to HTML.
#[must_use]
pub fn render_html(nodes: &[RichNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out
}

fn render_node(node: &RichNode, out: &mut String) {
    match node {
        RichNode::Text(text) => out.push_str(&escape_text(text)),
        RichNode::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.replace("--", "- -"));
            out.push_str("-->");
        }
        RichNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                out.push_str(" />");
                return;
            }
            out.push('>');
            for child in &el.children {
                render_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

/// Escape text content for embedding in HTML.
#[must_use]
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape a double-quoted attribute value.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
