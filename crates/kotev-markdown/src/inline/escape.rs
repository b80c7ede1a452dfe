use super::{Excerpt, InlineMatch, InlineRule};
use crate::element::Element;
use crate::engine::Engine;

/// Backslash escapes of the engine's escapable characters.
pub struct Escape;

impl InlineRule for Escape {
    fn parse(&self, excerpt: &Excerpt<'_>, engine: &Engine) -> Option<InlineMatch> {
        let escaped = excerpt.text.strip_prefix('\\')?.chars().next()?;
        engine
            .is_escapable(escaped)
            .then(|| InlineMatch::new(1 + escaped.len_utf8(), Element::text(escaped.to_string())))
    }
}
