//! Rule registry keyed by trigger character.

use std::collections::HashMap;

use crate::block::{
    AtxHeading, BlockQuote, BlockRule, FencedCode, HtmlBlock, IndentedCode, List, ParagraphHook,
    SetextHeading, ThematicBreak,
};
use crate::inline::{
    Autolink, CodeSpan, Emphasis, Escape, Image, InlineMarkup, InlineRule, Link, Strikethrough,
};

/// Characters a backslash escapes by default.
const ESCAPABLE: &str = "\\`*_{}[]()<>#+-.!|~";

/// Block and inline rules the engine dispatches to.
///
/// Block rules are looked up by the first character of a line's text,
/// inline rules by the character at the scan position. Rules for the same
/// trigger are tried in registration order.
///
/// # Example
///
/// ```
/// use kotev_markdown::{Engine, Registry};
///
/// let mut registry = Registry::standard();
/// registry.add_escapable('/');
/// let engine = Engine::new(registry);
/// assert_eq!(engine.text(r"a\/b"), "<p>a/b</p>");
/// ```
#[derive(Default)]
pub struct Registry {
    block_rules: Vec<Box<dyn BlockRule>>,
    block_triggers: HashMap<char, Vec<usize>>,
    unmarked_blocks: Vec<usize>,
    inline_rules: HashMap<char, Vec<Box<dyn InlineRule>>>,
    escapable: Vec<char>,
    paragraph_hooks: Vec<Box<dyn ParagraphHook>>,
}

impl Registry {
    /// Create a registry with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard Markdown constructs.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.escapable = ESCAPABLE.chars().collect();

        registry.add_block("", IndentedCode);
        registry.add_block("#", AtxHeading);
        registry.add_block("=-", SetextHeading);
        registry.add_block("-*_", ThematicBreak);
        registry.add_block("-*+0123456789", List);
        registry.add_block(">", BlockQuote);
        registry.add_block("`~", FencedCode);
        registry.add_block("<", HtmlBlock);

        registry.add_inline('\\', Escape);
        registry.add_inline('`', CodeSpan);
        registry.add_inline('*', Emphasis);
        registry.add_inline('_', Emphasis);
        registry.add_inline('~', Strikethrough);
        registry.add_inline('!', Image);
        registry.add_inline('[', Link);
        registry.add_inline('<', Autolink);
        registry.add_inline('<', InlineMarkup);
        registry
    }

    /// Register a block rule for every character in `triggers`.
    ///
    /// An empty `triggers` registers a rule tried on every line, before the
    /// triggered ones.
    pub fn add_block(&mut self, triggers: &str, rule: impl BlockRule + 'static) {
        let id = self.block_rules.len();
        self.block_rules.push(Box::new(rule));
        if triggers.is_empty() {
            self.unmarked_blocks.push(id);
        }
        for trigger in triggers.chars() {
            self.block_triggers.entry(trigger).or_default().push(id);
        }
    }

    /// Append an inline rule for `trigger`.
    pub fn add_inline(&mut self, trigger: char, rule: impl InlineRule + 'static) {
        self.inline_rules
            .entry(trigger)
            .or_default()
            .push(Box::new(rule));
    }

    /// Make `rule` the only inline rule for `trigger`.
    pub fn replace_inline(&mut self, trigger: char, rule: impl InlineRule + 'static) {
        self.inline_rules.insert(trigger, vec![Box::new(rule)]);
    }

    /// Let a backslash escape `c`.
    pub fn add_escapable(&mut self, c: char) {
        if !self.escapable.contains(&c) {
            self.escapable.push(c);
        }
    }

    /// Add a check run on paragraphs.
    pub fn add_paragraph_hook(&mut self, hook: impl ParagraphHook + 'static) {
        self.paragraph_hooks.push(Box::new(hook));
    }

    pub(crate) fn block_rule(&self, id: usize) -> &dyn BlockRule {
        self.block_rules[id].as_ref()
    }

    /// Block rule ids to try for a line, in order.
    pub(crate) fn block_candidates(&self, marker: Option<char>) -> impl Iterator<Item = usize> + '_ {
        let triggered = marker
            .and_then(|m| self.block_triggers.get(&m))
            .map_or(&[][..], Vec::as_slice);
        self.unmarked_blocks.iter().chain(triggered).copied()
    }

    pub(crate) fn inline_rules(&self, trigger: char) -> &[Box<dyn InlineRule>] {
        self.inline_rules.get(&trigger).map_or(&[][..], Vec::as_slice)
    }

    pub(crate) fn has_inline(&self, c: char) -> bool {
        self.inline_rules.contains_key(&c)
    }

    pub(crate) fn is_escapable(&self, c: char) -> bool {
        self.escapable.contains(&c)
    }

    pub(crate) fn paragraph_hooks(&self) -> &[Box<dyn ParagraphHook>] {
        &self.paragraph_hooks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::engine::Engine;
    use crate::inline::{Excerpt, InlineMatch};

    struct Shout;

    impl InlineRule for Shout {
        fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
            excerpt
                .text
                .starts_with("_!")
                .then(|| InlineMatch::new(2, Element::text("!")))
        }
    }

    #[test]
    fn test_replace_inline_drops_previous_rules() {
        let mut registry = Registry::standard();
        registry.replace_inline('_', Shout);
        assert_eq!(registry.inline_rules('_').len(), 1);
        assert_eq!(registry.inline_rules('*').len(), 1);
    }

    #[test]
    fn test_block_candidates_order() {
        let registry = Registry::standard();
        // Indented code, then setext, thematic break, list
        let ids: Vec<_> = registry.block_candidates(Some('-')).collect();
        assert_eq!(ids, vec![0, 2, 3, 4]);
        let ids: Vec<_> = registry.block_candidates(Some('a')).collect();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn test_add_escapable() {
        let mut registry = Registry::standard();
        assert!(!registry.is_escapable('/'));
        registry.add_escapable('/');
        assert!(registry.is_escapable('/'));
    }
}
