//! Smart punctuation for mixed Hebrew and Latin text.
//!
//! Works on serialized HTML. Tags, comments and the contents of code-like
//! elements are protected first, so only literal text between two tag
//! boundaries is rewritten. Substitutions run in a fixed order: ellipsis,
//! em dash, double quotes, single quotes.
//!
//! Quote direction is a heuristic: a quoted span that follows a Hebrew
//! letter (with only non-word characters in between) is treated as
//! right-to-left and gets its glyphs swapped.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RenderError;
use crate::protect::{ProtectedRegions, segments};

/// Markup the substitutions must not see.
static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    let verbatim = ["pre", "code", "kbd", "samp", "script", "style"]
        .iter()
        .map(|tag| format!(r"<{tag}\b[^>]*>.*?</{tag}\s*>"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r#"(?is){verbatim}|<!--.*?-->|</?[a-z][a-z0-9-]*(?:[^>"']|"[^"]*"|'[^']*')*>"#
    ))
    .expect("invalid protected markup regex")
});

/// Ordered substitution cascade.
static CASCADE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\.\.\.", "…"),
        ("--", "—"),
        // Gershayim
        (r#"([א-ת])"([א-ת])"#, "${1}״${2}"),
        (r#"([א-ת])(\W*)"(.+?)""#, "${1}${2}”${3}“"),
        (r#""(.+?)""#, "“${1}”"),
        // Geresh
        (r"([א-ת])'(\W)", "${1}׳${2}"),
        (r"([א-ת])(\W*)'(.+?)'", "${1}${2}’${3}‘"),
        // Apostrophe
        (r"(\w)'(\w)", "${1}’${2}"),
        (r"'(.+?)'", "‘${1}’"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("invalid punctuation regex"),
            replacement,
        )
    })
    .collect()
});

/// Apply smart punctuation to an HTML fragment.
///
/// # Errors
///
/// Only fails if placeholder restoration hits an internal inconsistency.
///
/// # Example
///
/// ```
/// use kotev_renderer::smarten;
///
/// let html = smarten(r#"<p title="a--b">"wait..." -- done</p>"#).unwrap();
/// assert_eq!(html, r#"<p title="a--b">“wait…” — done</p>"#);
/// ```
pub fn smarten(html: &str) -> Result<String, RenderError> {
    let mut regions = ProtectedRegions::new();
    let text = apply(html, &mut regions);
    regions.restore(&text)
}

/// Protect markup in `html` and rewrite the remaining text.
///
/// The result still holds placeholders; the caller restores them once the
/// whole pipeline is done with `regions`.
pub(crate) fn apply(html: &str, regions: &mut ProtectedRegions) -> String {
    let text = regions.remove(&PROTECTED, html);
    segments(&text)
        .into_iter()
        .map(|(placeholder, part)| {
            if placeholder {
                part.to_owned()
            } else {
                substitute(part)
            }
        })
        .collect()
}

/// Run the substitution cascade on plain text.
#[must_use]
pub fn substitute(text: &str) -> String {
    CASCADE
        .iter()
        .fold(text.to_owned(), |current, (pattern, replacement)| {
            pattern.replace_all(&current, *replacement).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ellipsis_and_dash() {
        assert_eq!(substitute("wait..."), "wait…");
        assert_eq!(substitute("well--then"), "well—then");
    }

    #[test]
    fn test_english_double_quotes() {
        assert_eq!(substitute(r#""hello""#), "“hello”");
        assert_eq!(substitute(r#"say "a" and "b""#), "say “a” and “b”");
    }

    #[test]
    fn test_gershayim() {
        assert_eq!(substitute(r#"א"ב"#), "א״ב");
        assert_eq!(substitute(r#"לפי רמב"ם"#), "לפי רמב״ם");
    }

    #[test]
    fn test_hebrew_double_quotes_swap() {
        assert_eq!(substitute(r#"אמר "שלום""#), "אמר ”שלום“");
    }

    #[test]
    fn test_geresh() {
        assert_eq!(substitute("ג' בחודש"), "ג׳ בחודש");
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(substitute("don't"), "don’t");
        assert_eq!(substitute("it's 'fine'"), "it’s ‘fine’");
        assert_eq!(substitute("אמר 'כן'"), "אמר ’כן‘");
    }

    #[test]
    fn test_ellipsis_before_quotes() {
        assert_eq!(substitute(r#""so...""#), "“so…”");
    }

    #[test]
    fn test_markup_untouched() {
        assert_eq!(
            smarten(r#"<a href="x--y" title='"q"'>a--b</a>"#).unwrap(),
            r#"<a href="x--y" title='"q"'>a—b</a>"#
        );
    }

    #[test]
    fn test_code_and_comments_untouched() {
        let html = "<p>a--b <code>c--d \"e\"</code></p><!-- x--y --><pre><code>...</code></pre>";
        assert_eq!(
            smarten(html).unwrap(),
            "<p>a—b <code>c--d \"e\"</code></p><!-- x--y --><pre><code>...</code></pre>"
        );
    }

    #[test]
    fn test_quotes_do_not_cross_tags() {
        assert_eq!(
            smarten(r#"<p>"a <em>b</em> c"</p>"#).unwrap(),
            r#"<p>"a <em>b</em> c"</p>"#
        );
    }

    #[test]
    fn test_idempotent() {
        let once = smarten(r#"<p>"hi" -- there... don't</p>"#).unwrap();
        assert_eq!(smarten(&once).unwrap(), once);
    }
}
