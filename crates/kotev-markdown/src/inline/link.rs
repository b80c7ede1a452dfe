use std::sync::LazyLock;

use regex::Regex;

use super::{Excerpt, InlineMatch, InlineRule};
use crate::element::{Content, Element};
use crate::engine::Engine;

/// `(destination "title")` following a link label.
static DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\(\s*(<[^>\n]*>|[^\s()]*(?:\([^\s()]*\)[^\s()]*)*)(?:\s+("[^"]*"|'[^']*'))?\s*\)"#,
    )
    .expect("invalid link destination regex")
});

/// Parts of `[label](destination "title")`.
struct LinkParts<'a> {
    label: &'a str,
    href: &'a str,
    title: Option<&'a str>,
    extent: usize,
}

/// Find the `]` closing the label that starts at `text[0]`.
fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_link(text: &str) -> Option<LinkParts<'_>> {
    if !text.starts_with('[') {
        return None;
    }
    let close = closing_bracket(text)?;
    let caps = DESTINATION.captures(&text[close + 1..])?;
    let href = caps.get(1)?.as_str();
    let href = href
        .strip_prefix('<')
        .and_then(|h| h.strip_suffix('>'))
        .unwrap_or(href);
    let title = caps.get(2).map(|m| {
        let quoted = m.as_str();
        &quoted[1..quoted.len() - 1]
    });
    Some(LinkParts {
        label: &text[1..close],
        href,
        title,
        extent: close + 1 + caps.get(0)?.end(),
    })
}

/// `[text](url "title")`.
pub struct Link;

impl InlineRule for Link {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let parts = parse_link(excerpt.text)?;
        let mut element =
            Element::new("a", Content::Inline(parts.label.to_owned())).with_attr("href", parts.href);
        if let Some(title) = parts.title {
            element.set_attr("title", title);
        }
        Some(InlineMatch::new(parts.extent, element))
    }
}

/// `![alt](src "title")`.
pub struct Image;

impl InlineRule for Image {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let parts = parse_link(excerpt.text.strip_prefix('!')?)?;
        let mut element = Element::new("img", Content::Empty)
            .with_attr("src", parts.href)
            .with_attr("alt", parts.label);
        if let Some(title) = parts.title {
            element.set_attr("title", title);
        }
        Some(InlineMatch::new(parts.extent + 1, element))
    }
}
