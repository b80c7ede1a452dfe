//! Line-oriented Markdown engine with pluggable rules.
//!
//! Every construct, built-in or not, is a rule registered in a [`Registry`]
//! under the character that triggers it:
//!
//! - [`BlockRule`]s are keyed by the first character of a line. They open
//!   [`Block`]s, or amend the block that is open, and receive the following
//!   lines until they decline them.
//! - [`InlineRule`]s are keyed by the character at the scan position and
//!   return an [`InlineMatch`] with the number of bytes consumed.
//! - [`ParagraphHook`]s may close a paragraph after any line it takes in.
//!
//! Rules produce [`Element`]s whose content may still be raw Markdown;
//! the [`Engine`] parses it when the element is rendered, which is how
//! nested inline constructs and block quotes recurse.
//!
//! # Example
//!
//! ```
//! use kotev_markdown::{Content, Element, Engine, Excerpt, InlineMatch, InlineRule, Registry};
//!
//! struct Mark;
//!
//! impl InlineRule for Mark {
//!     fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
//!         let rest = excerpt.text.strip_prefix("==")?;
//!         let end = rest.find("==")?;
//!         let element = Element::new("mark", Content::Inline(rest[..end].to_owned()));
//!         Some(InlineMatch::new(end + 4, element))
//!     }
//! }
//!
//! let mut registry = Registry::standard();
//! registry.add_inline('=', Mark);
//! let engine = Engine::new(registry);
//! assert_eq!(engine.text("a ==*b*== c"), "<p>a <mark><em>b</em></mark> c</p>");
//! ```

pub mod block;
mod element;
mod engine;
mod escape;
pub mod inline;
mod line;
mod registry;

pub use block::{Block, BlockKind, BlockRule, BlockStart, BlockState, ParagraphHook, Resume};
pub use element::{Content, Element};
pub use engine::{Engine, MAX_NESTING};
pub use escape::{escape_attr, escape_html, escape_text};
pub use inline::{Excerpt, InlineMatch, InlineRule};
pub use line::Line;
pub use registry::Registry;
