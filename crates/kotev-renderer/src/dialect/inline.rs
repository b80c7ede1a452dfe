//! Inline rules for `/italic/`, `_cite_` and `{: attributes }`.

use std::sync::LazyLock;

use kotev_dom::MARKER_TAG;
use kotev_markdown::{Content, Element, Engine, Excerpt, InlineMatch, InlineRule};
use regex::Regex;

use crate::attributes::parse_shorthand;

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/((?:\\.|[^/\\\n])+)/").expect("invalid italic regex"));

static CITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_((?:\\.|[^_\\\n])+)_").expect("invalid cite regex"));

static ATTRIBUTE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\{:((?:"[^"]*"|'[^']*'|[^}\n])+?)\}\s*"#).expect("invalid attribute marker regex")
});

/// Character right after a match of `len` bytes.
fn char_after(excerpt: &Excerpt<'_>, len: usize) -> Option<char> {
    excerpt.text[len..].chars().next()
}

/// `/text/`: right-to-left emphasis, rendered as `<i lang="..">`.
///
/// Does not open right after a letter, digit, `/` or `:` so paths, URLs
/// and fractions stay literal.
pub struct Italic {
    lang: String,
}

impl Italic {
    #[must_use]
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

impl InlineRule for Italic {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        if excerpt
            .before
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '/' | ':'))
        {
            return None;
        }
        let caps = ITALIC.captures(excerpt.text)?;
        let whole = caps.get(0)?;
        let element = Element::new("i", Content::Inline(caps[1].to_owned()))
            .with_attr("lang", self.lang.as_str());
        Some(InlineMatch::new(whole.end(), element))
    }
}

/// `_text_`: a citation.
///
/// Takes over `_` entirely; underscores inside words stay literal.
pub struct Cite;

impl InlineRule for Cite {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        if excerpt.before.is_some_and(char::is_alphanumeric) {
            return None;
        }
        let caps = CITE.captures(excerpt.text)?;
        let whole = caps.get(0)?;
        if char_after(excerpt, whole.end()).is_some_and(char::is_alphanumeric) {
            return None;
        }
        let element = Element::new("cite", Content::Inline(caps[1].to_owned()));
        Some(InlineMatch::new(whole.end(), element))
    }
}

/// `{: tokens }`: an attribute marker for the post-processor to hoist.
///
/// Consumes trailing whitespace so a marker on its own line leaves nothing
/// behind.
pub struct AttributeMarker;

impl InlineRule for AttributeMarker {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let caps = ATTRIBUTE_MARKER.captures(excerpt.text)?;
        let whole = caps.get(0)?;
        let mut element = Element::new(MARKER_TAG, Content::Empty);
        for (name, value) in parse_shorthand(&caps[1]).iter() {
            element.set_attr(name, value);
        }
        Some(InlineMatch::new(whole.end(), element))
    }
}

/// Check whether `text` is a lone attribute marker.
pub(crate) fn is_attribute_line(text: &str) -> bool {
    ATTRIBUTE_MARKER
        .find(text)
        .is_some_and(|found| found.end() == text.len())
}
