//! Protected regions.
//!
//! Text passes that must not touch some substrings (tags, code, already
//! finished nested output) first swap those substrings for placeholder
//! tokens, then put them back once every pass is done.
//!
//! A token is the sentinel character U+FFFC, the 1-based region id in
//! decimal, and the sentinel again: `\u{FFFC}7\u{FFFC}`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RenderError;

/// Sentinel character delimiting placeholder ids.
pub const SENTINEL: char = '\u{FFFC}';

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{FFFC}([0-9]+)\u{FFFC}").expect("invalid placeholder regex"));

/// Substrings removed from a text, by id.
///
/// One table serves one top-level conversion: every removal happens first,
/// then a single [`restore`](Self::restore). Nested conversions use their
/// own table.
#[derive(Debug, Default)]
pub struct ProtectedRegions {
    entries: Vec<String>,
}

impl ProtectedRegions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of protected regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `original` and return its placeholder token.
    pub fn protect(&mut self, original: impl Into<String>) -> String {
        self.entries.push(original.into());
        placeholder(self.entries.len())
    }

    /// Replace every match of `pattern` in `text` with a placeholder.
    ///
    /// Matches are registered left to right.
    pub fn remove(&mut self, pattern: &Regex, text: &str) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| self.protect(&caps[0]))
            .into_owned()
    }

    /// Replace every placeholder in `text` with its original substring.
    ///
    /// Regions that themselves contain placeholders are expanded too.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownPlaceholder`] for a token whose id was
    /// never handed out by this table.
    pub fn restore(&self, text: &str) -> Result<String, RenderError> {
        let mut current = text.to_owned();
        // Each pass expands one level of nesting; ids only refer backwards,
        // so nesting is at most as deep as the table is long.
        for _ in 0..=self.entries.len() {
            if !PLACEHOLDER.is_match(&current) {
                break;
            }
            current = self.restore_once(&current)?;
        }
        Ok(current)
    }

    fn restore_once(&self, text: &str) -> Result<String, RenderError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let id: usize = caps[1]
                .parse()
                .map_err(|_| RenderError::UnknownPlaceholder(usize::MAX))?;
            let original = id
                .checked_sub(1)
                .and_then(|index| self.entries.get(index))
                .ok_or(RenderError::UnknownPlaceholder(id))?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(original);
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

/// Placeholder token for a region id.
#[must_use]
pub fn placeholder(id: usize) -> String {
    format!("{SENTINEL}{id}{SENTINEL}")
}

/// Split `text` into runs of plain text and placeholder tokens.
///
/// Yields `(is_placeholder, slice)` pairs covering `text` in order.
pub(crate) fn segments(text: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut last = 0;
    for found in PLACEHOLDER.find_iter(text) {
        if found.start() > last {
            out.push((false, &text[last..found.start()]));
        }
        out.push((true, found.as_str()));
        last = found.end();
    }
    if last < text.len() {
        out.push((false, &text[last..]));
    }
    out
}

/// Remove sentinel characters so input cannot forge placeholders.
pub fn strip_sentinels(text: &str) -> Cow<'_, str> {
    if !text.contains(SENTINEL) {
        return Cow::Borrowed(text);
    }
    let count = text.matches(SENTINEL).count();
    tracing::warn!(count, "Stripping placeholder sentinel characters from input");
    Cow::Owned(text.replace(SENTINEL, ""))
}
