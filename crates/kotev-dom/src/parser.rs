//! HTML fragment parser.
//!
//! Reads the markup produced by the Markdown engine (plus whatever raw HTML
//! the author wrote) with `quick-xml` in a forgiving configuration and builds
//! a [`Tree`]. Reserved elements become transient node kinds.
//!
//! `script` and `style` content is raw text: it is escaped before the XML
//! reader runs, so it comes back as a single text node.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::{Captures, Regex};

use crate::attrs::Attributes;
use crate::entities::normalize_entities;
use crate::error::DomError;
use crate::serializer::escape_text;
use crate::tree::{MARKER_TAG, NodeData, NodeId, ROOT_TAG, SOURCE_CLASS, SOURCE_FOOTER_TAG, Tree};

/// HTML elements that never have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// HTML elements whose content is text, never markup.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A raw text element with its content.
static RAW_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<script\b[^>]*>)(.*?)(</script\s*>)|(<style\b[^>]*>)(.*?)(</style\s*>)")
        .expect("invalid raw text regex")
});

/// Check if a tag is an HTML void element.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Check if a tag is an HTML raw text element.
#[must_use]
pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Parse HTML fragments into a [`Tree`].
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML fragment.
    ///
    /// The fragment's top-level nodes become children of the tree root.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is too broken for the XML reader,
    /// e.g. a `<` that starts no tag.
    pub fn parse(&self, html: &str) -> Result<Tree, DomError> {
        let html = normalize_entities(&escape_raw_text(html));

        let mut reader = Reader::from_str(&html);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut tree = Tree::new();
        // Open elements, innermost last. The root is never closed.
        let mut open: Vec<(NodeId, String)> = vec![(tree.root(), ROOT_TAG.to_owned())];

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let tag = self.decode_tag(&reader, e.name().as_ref());
                    let node = self.create_node(&mut tree, &reader, &e, &tag);
                    let parent = current(&open);
                    tree.append(parent, node);
                    if !is_void_element(&tag) {
                        open.push((node, tag));
                    }
                }
                Event::Empty(e) => {
                    let tag = self.decode_tag(&reader, e.name().as_ref());
                    let node = self.create_node(&mut tree, &reader, &e, &tag);
                    tree.append(current(&open), node);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut tree, current(&open), &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut tree, current(&open), &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut tree, current(&open), &text);
                }
                Event::Comment(e) => {
                    let body = reader.decoder().decode(&e)?.into_owned();
                    let node = tree.create(NodeData::Comment(body));
                    tree.append(current(&open), node);
                }
                Event::End(e) => {
                    let tag = self.decode_tag(&reader, e.name().as_ref());
                    // Close up to the nearest matching element; stray end
                    // tags (including those of void elements) are ignored.
                    if let Some(pos) = open.iter().skip(1).rposition(|(_, open_tag)| *open_tag == tag)
                    {
                        open.truncate(pos + 1);
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        Ok(tree)
    }

    fn create_node(
        &self,
        tree: &mut Tree,
        reader: &Reader<&[u8]>,
        e: &BytesStart,
        tag: &str,
    ) -> NodeId {
        let attrs = self.decode_attrs(reader, e);
        let data = if tag == MARKER_TAG {
            NodeData::Marker(attrs)
        } else if tag == SOURCE_FOOTER_TAG && has_class(&attrs, SOURCE_CLASS) {
            NodeData::SourceFooter(attrs)
        } else {
            NodeData::Element {
                tag: tag.to_owned(),
                attrs,
            }
        };
        tree.create(data)
    }

    fn decode_tag(&self, reader: &Reader<&[u8]>, name: &[u8]) -> String {
        reader
            .decoder()
            .decode(name)
            .map_or_else(|_| String::from_utf8_lossy(name).into_owned(), |tag| {
                tag.to_ascii_lowercase()
            })
    }

    fn decode_attrs(&self, reader: &Reader<&[u8]>, e: &BytesStart) -> Attributes {
        let mut attrs = Attributes::new();
        for attr in e.html_attributes().flatten() {
            let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
                |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                |key| key.to_ascii_lowercase(),
            );
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            if !attrs.set(key, value) {
                tracing::debug!("Dropping attribute with illegal name");
            }
        }
        attrs
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape `script` and `style` content so the XML reader reads it as text.
fn escape_raw_text(html: &str) -> Cow<'_, str> {
    RAW_TEXT.replace_all(html, |caps: &Captures| {
        let (open, body, close) = if caps.get(1).is_some() {
            (&caps[1], &caps[2], &caps[3])
        } else {
            (&caps[4], &caps[5], &caps[6])
        };
        format!("{open}{}{close}", escape_text(body))
    })
}

/// Innermost open element.
fn current(open: &[(NodeId, String)]) -> NodeId {
    open.last().map_or(NodeId::ROOT, |(node, _)| *node)
}

fn has_class(attrs: &Attributes, class: &str) -> bool {
    attrs
        .get("class")
        .is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

/// Append text to the last child if it is text, otherwise add a text node.
fn append_text(tree: &mut Tree, parent: NodeId, text: &str) {
    if let Some(&last) = tree.children(parent).last()
        && let NodeData::Text(existing) = tree.data_mut(last)
    {
        existing.push_str(text);
        return;
    }
    let node = tree.create_text(text);
    tree.append(parent, node);
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity, keep it literally
        _ => format!("&{entity};"),
    }
}
