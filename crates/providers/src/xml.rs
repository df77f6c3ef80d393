//! XML document helpers shared by the XML-speaking adapters.
//!
//! Parsing never panics and never propagates past the adapter: a body that
//! is not well-formed XML yields a [`ParseFailure`] which the caller folds
//! into a failed response. Element lookups match on local names, so
//! provider namespaces can be ignored.

use roxmltree::{Document, Node};
use thiserror::Error;

/// A body that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed XML: {0}")]
pub struct ParseFailure(pub String);

/// Parse a response body.
///
/// # Errors
///
/// Returns `ParseFailure` if the body is not well-formed XML.
pub fn parse(body: &str) -> Result<Document<'_>, ParseFailure> {
    Document::parse(body).map_err(|e| ParseFailure(e.to_string()))
}

fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// First descendant element (including `node` itself) named `name`.
#[must_use]
pub fn find<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| is_named(n, name))
}

/// Every descendant element named `name`, in document order.
pub fn find_all<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().filter(move |n| is_named(n, name))
}

/// Direct child element named `name`.
#[must_use]
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_named(n, name))
}

/// Elements matching a child-combinator path such as `A > B > C`.
///
/// The first segment matches any descendant; each following segment
/// matches direct children of the previous match.
#[must_use]
pub fn select<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut matches: Vec<Node<'a, 'input>> =
        node.descendants().filter(|n| is_named(n, first)).collect();
    for segment in rest {
        matches = matches
            .into_iter()
            .flat_map(|m| m.children().filter(|n| is_named(n, segment)))
            .collect();
    }
    matches
}

/// Concatenated, trimmed text content of an element.
#[must_use]
pub fn text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trimmed text of the first descendant named `name`.
#[must_use]
pub fn text_of(node: Node<'_, '_>, name: &str) -> Option<String> {
    find(node, name).map(text)
}
