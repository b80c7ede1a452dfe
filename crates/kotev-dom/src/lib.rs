//! HTML document tree for the Kotev renderer.
//!
//! Parses HTML fragments into an arena-backed [`Tree`], lets callers move
//! nodes and attributes around, and serializes the result back to HTML.
//! Attribute markers (`<x-attrs>`) and source footers (`<footer
//! class="source">`) are recognized at parse time as [`NodeData::Marker`]
//! and [`NodeData::SourceFooter`]; they must be resolved before
//! serialization.
//!
//! # Example
//!
//! ```
//! use kotev_dom::{HtmlParser, HtmlSerializer};
//!
//! let tree = HtmlParser::new().parse("<p>Hello<br>world</p>").unwrap();
//! let html = HtmlSerializer::new().serialize(&tree).unwrap();
//! assert_eq!(html, "<p>Hello<br />world</p>");
//! ```

mod attrs;
mod entities;
mod error;
mod parser;
mod serializer;
mod tree;

pub use attrs::{Attributes, is_valid_name};
pub use entities::{convert_html_entities, escape_bare_ampersands, normalize_entities};
pub use error::DomError;
pub use parser::{HtmlParser, RAW_TEXT_ELEMENTS, VOID_ELEMENTS, is_raw_text_element, is_void_element};
pub use serializer::{HtmlSerializer, escape_attr, escape_text};
pub use tree::{MARKER_TAG, NodeData, NodeId, SOURCE_CLASS, SOURCE_FOOTER_TAG, Tree};
