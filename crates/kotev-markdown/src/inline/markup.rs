use std::sync::LazyLock;

use regex::Regex;

use super::{Excerpt, InlineMatch, InlineRule};
use crate::element::{Content, Element};
use crate::engine::Engine;

static URL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9+.-]{1,31}:[^\s<>]*)>").expect("invalid autolink regex")
});

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([^\s@<>]+@[^\s@<>]+\.[^\s@<>]+)>").expect("invalid email autolink regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:</[a-zA-Z][\w-]*\s*>|<!--(?s:.*?)-->|<[a-zA-Z][\w-]*(?:\s+[a-zA-Z_:][\w:.-]*(?:\s*=\s*(?:[^"'=<>`\s]+|"[^"]*"|'[^']*'))?)*\s*/?>)"#,
    )
    .expect("invalid inline tag regex")
});

/// `<https://example.com>` and `<someone@example.com>`.
pub struct Autolink;

impl InlineRule for Autolink {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        if let Some(caps) = URL_AUTOLINK.captures(excerpt.text) {
            let url = &caps[1];
            let element = Element::new("a", Content::Text(url.to_owned())).with_attr("href", url);
            return Some(InlineMatch::new(caps.get(0)?.end(), element));
        }
        let caps = EMAIL_AUTOLINK.captures(excerpt.text)?;
        let address = &caps[1];
        let element = Element::new("a", Content::Text(address.to_owned()))
            .with_attr("href", format!("mailto:{address}"));
        Some(InlineMatch::new(caps.get(0)?.end(), element))
    }
}

/// Opening tags, closing tags and comments written by the author.
pub struct InlineMarkup;

impl InlineRule for InlineMarkup {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let found = TAG.find(excerpt.text)?;
        Some(InlineMatch::new(found.end(), Element::raw(found.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rule: &dyn InlineRule, text: &str) -> Option<InlineMatch> {
        rule.parse(&Excerpt { text, before: None }, &Engine::default())
    }

    #[test]
    fn test_url_autolink() {
        let found = parse(&Autolink, "<https://example.com/a/b> x").unwrap();
        assert_eq!(found.element.attr("href"), Some("https://example.com/a/b"));
        assert_eq!(found.extent, 25);
    }

    #[test]
    fn test_email_autolink() {
        let found = parse(&Autolink, "<me@example.com>").unwrap();
        assert_eq!(found.element.attr("href"), Some("mailto:me@example.com"));
    }

    #[test]
    fn test_inline_tags() {
        let open = parse(&InlineMarkup, r#"<span class="x" hidden>t"#).unwrap();
        assert_eq!(open.element.content, Content::Raw(r#"<span class="x" hidden>"#.to_owned()));
        let close = parse(&InlineMarkup, "</span> t").unwrap();
        assert_eq!(close.extent, 7);
        assert!(parse(&InlineMarkup, "<!-- c --> t").is_some());
    }

    #[test]
    fn test_less_than_is_not_markup() {
        assert!(parse(&InlineMarkup, "< 3").is_none());
        assert!(parse(&InlineMarkup, "<3").is_none());
    }
}
