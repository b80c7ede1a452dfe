//! Attribute shorthand parsing for `{: ... }` markers.
//!
//! Tokens are separated by whitespace outside quotes:
//!
//! - `#name` sets `id`
//! - `.name` adds a class (several merge)
//! - a bare two-letter ASCII alphabetic token sets `lang`
//! - a token wrapped in quotes is unwrapped and read as `key=value` pairs
//! - anything else is read as one `key`, `key=value`, `key="value"` or
//!   `key='value'` attribute
//!
//! Fragments that fit none of these are dropped.

use std::sync::LazyLock;

use kotev_dom::Attributes;
use regex::Regex;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z_:][\w:.-]*)(?:=(?:"([^"]*)"|'([^']*)'|([^\s"']*)))?$"#)
        .expect("invalid attribute regex")
});

/// Parse the inside of a `{: ... }` marker.
///
/// # Example
///
/// ```
/// use kotev_renderer::parse_shorthand;
///
/// let attrs = parse_shorthand(r#"#intro .wide .dark en data-x="a b""#);
/// assert_eq!(attrs.get("id"), Some("intro"));
/// assert_eq!(attrs.get("class"), Some("wide dark"));
/// assert_eq!(attrs.get("lang"), Some("en"));
/// assert_eq!(attrs.get("data-x"), Some("a b"));
/// ```
#[must_use]
pub fn parse_shorthand(list: &str) -> Attributes {
    let mut attrs = Attributes::new();
    for token in tokenize(list) {
        apply_token(&mut attrs, token);
    }
    attrs
}

fn apply_token(attrs: &mut Attributes, token: &str) {
    if let Some(id) = token.strip_prefix('#')
        && !id.is_empty()
    {
        set(attrs, "id", id);
    } else if let Some(class) = token.strip_prefix('.')
        && !class.is_empty()
    {
        add_class(attrs, class);
    } else if token.len() == 2 && token.chars().all(|c| c.is_ascii_alphabetic()) {
        set(attrs, "lang", token);
    } else if let Some(inner) = unquote(token) {
        for piece in tokenize(inner) {
            apply_attribute(attrs, piece);
        }
    } else {
        apply_attribute(attrs, token);
    }
}

fn apply_attribute(attrs: &mut Attributes, token: &str) {
    let Some(caps) = ATTRIBUTE.captures(token) else {
        tracing::debug!(token, "Dropping unparseable attribute token");
        return;
    };
    let name = caps[1].to_ascii_lowercase();
    let value = caps
        .get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map_or("", |m| m.as_str());
    if name == "class" {
        for class in value.split_whitespace() {
            add_class(attrs, class);
        }
    } else {
        set(attrs, &name, value);
    }
}

fn add_class(attrs: &mut Attributes, class: &str) {
    let merged = match attrs.get("class") {
        Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
        _ => class.to_owned(),
    };
    set(attrs, "class", &merged);
}

fn set(attrs: &mut Attributes, name: &str, value: &str) {
    if !attrs.set(name, value) {
        tracing::debug!(name, "Dropping attribute with illegal name");
    }
}

/// Strip matching outer quotes.
fn unquote(token: &str) -> Option<&str> {
    let quote = token.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    token
        .strip_prefix(quote)?
        .strip_suffix(quote)
        .filter(|inner| !inner.contains(quote))
}

/// Split on whitespace that is not inside quotes.
///
/// An unbalanced quote runs to the end of the list.
fn tokenize(list: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut quote: Option<char> = None;

    for (pos, c) in list.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c.is_whitespace() => {
                if let Some(begin) = start.take() {
                    tokens.push(&list[begin..pos]);
                }
            }
            None => {
                if matches!(c, '"' | '\'') {
                    quote = Some(c);
                }
                start.get_or_insert(pos);
            }
        }
    }
    if let Some(begin) = start {
        tokens.push(&list[begin..]);
    }
    tokens
}
