//! Serialize a [`Tree`] back to HTML.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use crate::error::DomError;
use crate::parser::{is_raw_text_element, is_void_element};
use crate::tree::{MARKER_TAG, NodeData, NodeId, SOURCE_FOOTER_TAG, Tree};

/// Serialize trees to HTML fragments.
pub struct HtmlSerializer;

impl HtmlSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the root's children.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::TransientNode`] if a marker or source footer is
    /// still in the tree.
    pub fn serialize(&self, tree: &Tree) -> Result<String, DomError> {
        self.serialize_children(tree, tree.root())
    }

    /// Serialize the children of `node` without the node itself.
    ///
    /// # Errors
    ///
    /// Same as [`serialize`](Self::serialize).
    pub fn serialize_children(&self, tree: &Tree, node: NodeId) -> Result<String, DomError> {
        let mut output = String::new();
        for &child in tree.children(node) {
            self.serialize_node(tree, child, &mut output)?;
        }
        Ok(output)
    }

    fn serialize_node(&self, tree: &Tree, node: NodeId, output: &mut String) -> Result<(), DomError> {
        match tree.data(node) {
            NodeData::Text(text) => output.push_str(&escape_text(text)),
            NodeData::Comment(body) => {
                output.push_str("<!--");
                output.push_str(body);
                output.push_str("-->");
            }
            NodeData::Marker(_) => return Err(DomError::TransientNode(MARKER_TAG)),
            NodeData::SourceFooter(_) => return Err(DomError::TransientNode(SOURCE_FOOTER_TAG)),
            NodeData::Element { tag, attrs } => {
                output.push('<');
                output.push_str(tag);
                for (name, value) in attrs.iter() {
                    output.push(' ');
                    output.push_str(name);
                    output.push_str("=\"");
                    output.push_str(&escape_attr(value));
                    output.push('"');
                }

                if is_void_element(tag) {
                    output.push_str(" />");
                    return Ok(());
                }

                output.push('>');
                let raw = is_raw_text_element(tag);
                for &child in tree.children(node) {
                    match tree.data(child) {
                        NodeData::Text(text) if raw => output.push_str(text),
                        _ => self.serialize_node(tree, child, output)?,
                    }
                }
                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
        }
        Ok(())
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text content. `>` is left alone.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::HtmlParser;

    fn roundtrip(html: &str) -> String {
        let tree = HtmlParser::new().parse(html).unwrap();
        HtmlSerializer::new().serialize(&tree).unwrap()
    }

    #[test]
    fn test_serialize_simple() {
        assert_eq!(roundtrip("<p>Hello</p>"), "<p>Hello</p>");
    }

    #[test]
    fn test_serialize_attributes_in_order() {
        assert_eq!(
            roundtrip(r#"<p id="a" class="b" lang="he">x</p>"#),
            r#"<p id="a" class="b" lang="he">x</p>"#
        );
    }

    #[test]
    fn test_serialize_void_and_empty() {
        assert_eq!(
            roundtrip(r#"<p>a<br>b</p><div></div><img src="x.png">"#),
            r#"<p>a<br />b</p><div></div><img src="x.png" />"#
        );
    }

    #[test]
    fn test_serialize_escapes() {
        assert_eq!(
            roundtrip(r#"<p title="a &quot;b&quot;">1 &lt; 2 &amp; 3 > 0</p>"#),
            r#"<p title="a &quot;b&quot;">1 &lt; 2 &amp; 3 > 0</p>"#
        );
    }

    #[test]
    fn test_serialize_comment() {
        assert_eq!(roundtrip("<!-- keep --><p>x</p>"), "<!-- keep --><p>x</p>");
    }

    #[test]
    fn test_serialize_unicode_untouched() {
        assert_eq!(roundtrip("<p>שלום “עולם”</p>"), "<p>שלום “עולם”</p>");
    }

    #[test]
    fn test_serialize_raw_text_elements() {
        let html = "<script>if (a<b && c) {}</script><style>p > a { color: red }</style>";
        assert_eq!(roundtrip(html), html);
    }

    #[test]
    fn test_marker_is_an_error() {
        let tree = HtmlParser::new().parse("<p><x-attrs class=\"a\"></x-attrs></p>").unwrap();
        let err = HtmlSerializer::new().serialize(&tree).unwrap_err();
        assert!(matches!(err, DomError::TransientNode("x-attrs")));
    }
}
