//! The Kotev dialect's rules for the Markdown engine.

mod block;
mod inline;

pub use block::{AttributeLine, SOURCE_BLOCK, SourceFooter};
pub use inline::{AttributeMarker, Cite, Italic};

use kotev_markdown::Registry;

/// Standard Markdown plus the dialect.
///
/// `_` loses its emphasis meaning and becomes a citation; `/` opens
/// emphasis in `italic_lang` and becomes escapable.
#[must_use]
pub fn dialect_registry(italic_lang: &str) -> Registry {
    let mut registry = Registry::standard();

    registry.add_inline('/', Italic::new(italic_lang));
    registry.add_escapable('/');
    registry.replace_inline('_', Cite);
    registry.add_inline('{', AttributeMarker);

    registry.add_block("-", SourceFooter);
    registry.add_paragraph_hook(AttributeLine);
    registry
}
