use crate::richtext::{RichElement, RichNode};

/// Attributes kept on rich-text elements. Everything else is dropped.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title", "target", "rel"];

/// Strip disallowed attributes and drop elements left without children.
///
/// Children are cleaned before their parent is checked, so an element whose
/// only children were empty elements is removed as well. Line breaks are kept
/// even though they never have children. Running this twice changes nothing.
pub fn sanitize(nodes: &mut Vec<RichNode>) {
    nodes.retain_mut(|node| match node {
        RichNode::Element(el) => {
            sanitize_element(el);
            !el.children.is_empty() || el.is_line_break()
        }
        RichNode::Text(_) | RichNode::Comment(_) => true,
    });
}

fn sanitize_element(el: &mut RichElement) {
    el.attrs.retain(|(name, _)| is_allowed(name));
    sanitize(&mut el.children);
}

fn is_allowed(name: &str) -> bool {
    ALLOWED_ATTRIBUTES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(name))
}

/// Sanitized copy of an element's children.
#[must_use]
pub fn sanitized_children(el: &RichElement) -> Vec<RichNode> {
    let mut nodes = el.children.clone();
    sanitize(&mut nodes);
    nodes
}
