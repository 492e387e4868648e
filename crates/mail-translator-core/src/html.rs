//! HTML-aware text-node extraction.
//!
//! This is a text-pattern transform, not a DOM parse: only content strictly
//! between a closing `>` and the next `<` is eligible for translation, and
//! malformed markup passes through the same transform without any
//! well-formedness validation. Tag structure, attributes, and inter-tag
//! whitespace are preserved byte for byte.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Content between a closing `>` and the next `<`
#[allow(clippy::expect_used)]
static TEXT_NODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">([^<>]+)<").expect("valid text-node pattern"));

/// Something that opens like a tag
#[allow(clippy::expect_used)]
static TAG_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!]").expect("valid tag pattern"));

/// Markup with its text nodes swapped for placeholder tokens.
#[derive(Debug, Clone)]
pub struct ExtractedNodes {
    /// The document with placeholders in text-node positions
    pub template: String,
    /// Trimmed text segments, in document order; segment `i` belongs to
    /// the token `placeholder(i)`
    pub segments: Vec<String>,
}

/// Whether the input should go through the text-node translator at all.
pub fn looks_like_markup(text: &str) -> bool {
    TAG_OPEN.is_match(text)
}

/// Placeholder token for segment `index`.
///
/// Tokens contain no markup syntax and no token is a substring of another,
/// so first-occurrence replacement during reassembly is unambiguous.
pub fn placeholder(index: usize) -> String {
    format!("__MAIL_TR_SEG_{index}__")
}

/// Swap every non-whitespace text node for a unique placeholder token.
///
/// Leading and trailing whitespace of each node stays in the template; only
/// the trimmed core is recorded for translation. Returns `None` when the
/// markup has no extractable text nodes.
pub fn extract_text_nodes(html: &str) -> Option<ExtractedNodes> {
    let mut segments: Vec<String> = Vec::new();

    let template = TEXT_NODE
        .replace_all(html, |caps: &Captures| {
            let inner = &caps[1];
            let core = inner.trim();
            if core.is_empty() {
                // Whitespace-only nodes are not translatable
                return caps[0].to_string();
            }

            let lead = &inner[..inner.len() - inner.trim_start().len()];
            let trail = &inner[inner.trim_end().len()..];
            let token = placeholder(segments.len());
            segments.push(core.to_string());
            format!(">{lead}{token}{trail}<")
        })
        .into_owned();

    if segments.is_empty() {
        None
    } else {
        Some(ExtractedNodes { template, segments })
    }
}

/// Replace each placeholder with its translated segment, first occurrence
/// only, in original order.
pub fn reassemble(template: &str, translated: &[String]) -> String {
    let mut output = template.to_string();
    for (index, text) in translated.iter().enumerate() {
        output = output.replacen(&placeholder(index), text, 1);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup("<p>Hello</p>"));
        assert!(looks_like_markup("before <br/> after"));
        assert!(looks_like_markup("<!DOCTYPE html><html></html>"));
        assert!(!looks_like_markup("plain text, 2 < 3 and 5 > 4"));
        assert!(!looks_like_markup("no markup at all"));
    }

    #[test]
    fn test_extracts_single_node() {
        let nodes = extract_text_nodes("<p>Hello</p>").unwrap();
        assert_eq!(nodes.segments, vec!["Hello"]);
        assert_eq!(nodes.template, format!("<p>{}</p>", placeholder(0)));
    }

    #[test]
    fn test_extracts_nested_nodes_in_order() {
        let nodes = extract_text_nodes("<div>Hi<span>there</span></div>").unwrap();
        assert_eq!(nodes.segments, vec!["Hi", "there"]);
    }

    #[test]
    fn test_no_text_nodes_returns_none() {
        assert!(extract_text_nodes("<div><img src=\"x.png\"/></div>").is_none());
        assert!(extract_text_nodes("<div>   \n  </div>").is_none());
        assert!(extract_text_nodes("").is_none());
    }

    #[test]
    fn test_preserves_surrounding_whitespace() {
        let nodes = extract_text_nodes("<p>\n  Hello  \n</p>").unwrap();
        assert_eq!(nodes.segments, vec!["Hello"]);
        assert_eq!(nodes.template, format!("<p>\n  {}  \n</p>", placeholder(0)));
    }

    #[test]
    fn test_identity_reassembly_is_byte_identical() {
        let html = "<div>Hi<span>there</span></div>";
        let nodes = extract_text_nodes(html).unwrap();
        assert_eq!(reassemble(&nodes.template, &nodes.segments), html);
    }

    #[test]
    fn test_reassemble_substitutes_translations() {
        let nodes = extract_text_nodes("<p>Hello</p><p>World</p>").unwrap();
        let translated = vec!["Bonjour".to_string(), "Monde".to_string()];
        assert_eq!(reassemble(&nodes.template, &translated), "<p>Bonjour</p><p>Monde</p>");
    }

    #[test]
    fn test_tokens_are_not_substrings_of_each_other() {
        // placeholder(1) must not appear inside placeholder(10)'s token
        assert!(!placeholder(10).contains(&placeholder(1)));
        assert!(!placeholder(12).contains(&placeholder(2)));
    }

    #[test]
    fn test_repeated_identical_segments_get_distinct_tokens() {
        let nodes = extract_text_nodes("<p>Hi</p><p>Hi</p>").unwrap();
        assert_eq!(nodes.segments, vec!["Hi", "Hi"]);
        assert!(nodes.template.contains(&placeholder(0)));
        assert!(nodes.template.contains(&placeholder(1)));
    }

    #[test]
    fn test_malformed_markup_is_not_validated() {
        // Unclosed tags still go through the same pattern transform
        let nodes = extract_text_nodes("<p>Hello<div>mid").unwrap();
        assert_eq!(nodes.segments, vec!["Hello"]);
    }
}
