use std::sync::LazyLock;

use regex::Regex;

use super::{Excerpt, InlineMatch, InlineRule};
use crate::element::{Content, Element};
use crate::engine::Engine;

static STRONG_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\*\*((?:\\\*|[^*]|\*[^*]*\*)+?)\*\*").expect("invalid strong regex")
});

static EM_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\*((?:\\\*|[^*]|\*\*[^*]+?\*\*)+?)\*").expect("invalid emphasis regex")
});

static STRONG_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^__((?:\\_|[^_]|_[^_]*_)+?)__").expect("invalid strong regex")
});

static EM_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^_((?:\\_|[^_]|__[^_]*__)+?)_").expect("invalid emphasis regex")
});

static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^~~(\S(?:.*?\S)??)~~").expect("invalid strikethrough regex")
});

/// `*em*`, `**strong**`, `_em_` and `__strong__`.
pub struct Emphasis;

impl Emphasis {
    fn try_match(re: &Regex, text: &str, marker: char, name: &str) -> Option<InlineMatch> {
        let caps = re.captures(text)?;
        let whole = caps.get(0)?;
        let inner = &caps[1];
        // The delimiter run must end here and must hug the text.
        if text[whole.end()..].starts_with(marker) || inner.starts_with(char::is_whitespace) {
            return None;
        }
        if marker == '_'
            && text[whole.end()..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric)
        {
            return None;
        }
        let element = Element::new(name, Content::Inline(inner.to_owned()));
        Some(InlineMatch::new(whole.end(), element))
    }
}

impl InlineRule for Emphasis {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let text = excerpt.text;
        let marker = text.chars().next()?;
        let (strong, em) = match marker {
            '*' => (&*STRONG_STAR, &*EM_STAR),
            '_' => (&*STRONG_UNDERSCORE, &*EM_UNDERSCORE),
            _ => return None,
        };
        if text[1..].starts_with(marker)
            && let Some(found) = Self::try_match(strong, text, marker, "strong")
        {
            return Some(found);
        }
        Self::try_match(em, text, marker, "em")
    }
}

/// `~~deleted~~`.
pub struct Strikethrough;

impl InlineRule for Strikethrough {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let caps = STRIKETHROUGH.captures(excerpt.text)?;
        let element = Element::new("del", Content::Inline(caps[1].to_owned()));
        Some(InlineMatch::new(caps.get(0)?.end(), element))
    }
}
