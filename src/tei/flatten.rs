//! Tree flattener: TEI body → ordered structural records

use super::record::{attr, tag, Attributes, StructuralRecord};
use crate::pipeline::{PipelineError, PipelineResult};
use roxmltree::{Document, Node};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Elements whose content is already encoded in other elements' attributes
const REDUNDANT: [&str; 2] = [tag::HEAD, tag::SPEAKER];

/// Locate the single `body` inside the single `text` element.
///
/// Any other cardinality is a structural violation.
pub fn body<'a, 'input>(document: &'a Document<'input>) -> PipelineResult<Node<'a, 'input>> {
    let texts: Vec<_> = document
        .descendants()
        .filter(|n| is_element_named(n, tag::TEXT))
        .collect();
    if texts.len() != 1 {
        return Err(PipelineError::StructuralViolation(format!(
            "expected exactly one <text> element, found {}",
            texts.len()
        )));
    }

    let bodies: Vec<_> = texts[0]
        .descendants()
        .filter(|n| is_element_named(n, tag::BODY))
        .collect();
    if bodies.len() != 1 {
        return Err(PipelineError::StructuralViolation(format!(
            "expected exactly one <body> in <text>, found {}",
            bodies.len()
        )));
    }
    Ok(bodies[0])
}

/// Flatten the descendants of `body` into records, in document order.
pub fn flatten(body: Node<'_, '_>) -> Vec<StructuralRecord> {
    body.descendants()
        .skip(1)
        .filter(|n| n.is_element() && !is_redundant(n))
        .map(|n| record_for(&n))
        .collect()
}

/// Parse the document's body straight into records.
pub fn structural_records(document: &Document<'_>) -> PipelineResult<Vec<StructuralRecord>> {
    Ok(flatten(body(document)?))
}

fn record_for(node: &Node<'_, '_>) -> StructuralRecord {
    StructuralRecord {
        tag: node.tag_name().name().to_string(),
        attributes: attributes(node),
        text: if is_leaf(node) { Some(text_content(node)) } else { None },
    }
}

/// Attributes with `xml:`-namespaced names keeping their prefix.
pub fn attributes(node: &Node<'_, '_>) -> Attributes {
    node.attributes()
        .map(|a| {
            let name = match a.namespace() {
                Some(XML_NAMESPACE) => format!("xml:{}", a.name()),
                _ => a.name().to_string(),
            };
            (name, a.value().to_string())
        })
        .collect()
}

/// The element's `xml:id`, if any
pub fn xml_id<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NAMESPACE, "id"))
}

/// A node with at most one child node (text, comment, or element).
pub fn is_leaf(node: &Node<'_, '_>) -> bool {
    node.children().take(2).count() <= 1
}

/// All descendant text, concatenated.
pub fn text_content(node: &Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// True for `head`/`speaker` elements and anything inside them.
fn is_redundant(node: &Node<'_, '_>) -> bool {
    node.ancestors()
        .any(|a| a.is_element() && REDUNDANT.contains(&a.tag_name().name()))
}

pub(crate) fn is_element_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Whether a node has a non-empty `n` attribute
pub(crate) fn has_number(node: &Node<'_, '_>) -> bool {
    node.attribute(attr::N).map(|n| !n.is_empty()).unwrap_or(false)
}
