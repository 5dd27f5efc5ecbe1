//! Wire-format helpers shared by every record's serializer.
//!
//! Booleans use canonical `true`/`false` text, numbers their default display
//! form, tuples comma-joined literals (parsing also tolerates `()` and `[]`
//! wrappers left by older writers).

use xmltree::{Element, XMLNode};

use crate::error::{CavewrightError, Result};

pub fn bool_to_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn text_to_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(CavewrightError::MalformedXml(format!(
            "boolean text must be \"true\" or \"false\", got \"{other}\""
        ))),
    }
}

pub fn number_to_text(value: f64) -> String {
    format!("{value}")
}

pub fn text_to_number(text: &str, what: &str) -> Result<f64> {
    text.trim().parse().map_err(|_| {
        CavewrightError::MalformedXml(format!("{what} must be a number, got \"{text}\""))
    })
}

pub fn tuple_to_text(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| number_to_text(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse `1,2,3`, `(1, 2, 3)`, or `[1,2,3]` into numbers.
pub fn text_to_tuple(text: &str) -> Result<Vec<f64>> {
    let inner = text
        .trim()
        .trim_matches(|c| matches!(c, '(' | ')' | '[' | ']'));
    inner
        .split(',')
        .map(|part| {
            part.trim().parse().map_err(|_| {
                CavewrightError::MalformedXml(format!(
                    "\"{text}\" is not a comma-separated list of numbers"
                ))
            })
        })
        .collect()
}

pub fn required_attr<'a>(node: &'a Element, name: &str) -> Result<&'a str> {
    node.attributes
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| {
            CavewrightError::MalformedXml(format!(
                "{} node must have {} attribute set",
                node.name, name
            ))
        })
}

pub fn attr_to_bool(node: &Element, name: &str, default: Option<bool>) -> Result<bool> {
    match node.attributes.get(name) {
        Some(text) => text_to_bool(text),
        None => default.ok_or_else(|| {
            CavewrightError::MalformedXml(format!(
                "attribute {} is required for node {}",
                name, node.name
            ))
        }),
    }
}

pub fn required_child<'a>(node: &'a Element, name: &str) -> Result<&'a Element> {
    node.get_child(name).ok_or_else(|| {
        CavewrightError::MalformedXml(format!(
            "{} node requires {} child node",
            node.name, name
        ))
    })
}

pub fn append_child(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

pub fn set_text(node: &mut Element, text: impl Into<String>) {
    node.children.push(XMLNode::Text(text.into()));
}

/// Trimmed text content of a node, if any.
pub fn node_text(node: &Element) -> Option<String> {
    node.get_text().map(|t| t.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
