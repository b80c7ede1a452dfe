//! Kotev: a Markdown dialect for mixed Hebrew and English writing.
//!
//! On top of standard Markdown the dialect adds:
//!
//! - `/text/`: emphasis in another language, `<i lang="he">text</i>`
//! - `_text_`: a citation, `<cite>text</cite>` (replaces `_` emphasis)
//! - `{: #id .class he key=value }`: attributes for the next element
//! - `--Author` lines: the source of a quotation, moved into a
//!   `<figure>`'s `<figcaption>`
//! - `markdown`/`md` attributes on raw HTML elements, whose content is
//!   then rendered too
//!
//! Output gets smart punctuation that knows about Hebrew gershayim and
//! geresh and about quotes in right-to-left text.
//!
//! # Example
//!
//! ```
//! use kotev_renderer::Renderer;
//!
//! let html = Renderer::default()
//!     .render("> Who is wise?\n--Pirkei Avot")
//!     .unwrap();
//! assert_eq!(
//!     html,
//!     "<figure><blockquote>\n<p>Who is wise?</p>\n</blockquote><figcaption>Pirkei Avot</figcaption></figure>"
//! );
//! ```

mod attributes;
pub mod dialect;
mod error;
pub mod postprocess;
pub mod protect;
mod punctuation;
mod renderer;

pub use attributes::parse_shorthand;
pub use error::RenderError;
pub use postprocess::OrphanPolicy;
pub use protect::ProtectedRegions;
pub use punctuation::{smarten, substitute};
pub use renderer::{MARKDOWN_ATTRIBUTES, RenderOptions, Renderer};
