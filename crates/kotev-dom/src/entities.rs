//! Entity handling ahead of XML parsing.
//!
//! HTML fragments may use named entities XML does not know, and stray `&`
//! characters that XML rejects. Both are normalized before `quick-xml` sees
//! the markup. The five XML entities are left for the parser.

use std::sync::LazyLock;

use regex::Regex;

/// Named HTML entity reference.
static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// An `&`, optionally followed by a complete entity reference.
static AMPERSAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;|#[xX][0-9a-fA-F]+;|[a-zA-Z][a-zA-Z0-9]*;)?")
        .expect("invalid ampersand regex")
});

/// Prepare an HTML fragment for the XML reader.
pub fn normalize_entities(html: &str) -> String {
    escape_bare_ampersands(&convert_html_entities(html))
}

/// Convert named HTML entities to Unicode characters.
///
/// Unknown names and the XML entities (`amp`, `lt`, `gt`, `quot`, `apos`)
/// are left unchanged.
pub fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            entity_to_unicode(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

/// Escape every `&` that does not start an entity reference.
pub fn escape_bare_ampersands(html: &str) -> String {
    AMPERSAND_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            if caps.get(1).is_some() {
                caps[0].to_owned()
            } else {
                "&amp;".to_owned()
            }
        })
        .into_owned()
}

/// Map HTML entity name to Unicode character.
fn entity_to_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        // Spacing and bidi controls
        "nbsp" => "\u{00a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "shy" => "\u{00ad}",
        "zwnj" => "\u{200c}",
        "zwj" => "\u{200d}",
        "lrm" => "\u{200e}",
        "rlm" => "\u{200f}",

        // Punctuation
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "bull" => "\u{2022}",
        "middot" => "\u{00b7}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",
        "para" => "\u{00b6}",
        "sect" => "\u{00a7}",

        // Symbols
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{00b0}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "plusmn" => "\u{00b1}",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        "frac12" => "\u{00bd}",
        "euro" => "\u{20ac}",
        "shekel" => "\u{20aa}",

        _ => return None,
    })
}
