//! The line-oriented block state machine and inline scanner.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockKind, BlockStart, Resume};
use crate::element::{Content, Element};
use crate::escape::{VOID_ELEMENTS, escape_attr, escape_html, escape_text};
use crate::inline::Excerpt;
use crate::line::Line;
use crate::registry::Registry;

/// Two trailing spaces or a trailing backslash before a newline.
static HARD_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?: {2,}| *\\)\n").expect("invalid hard break regex"));

/// Deepest nesting of deferred content that is still parsed.
///
/// Content nested deeper (quotes in quotes, lists in lists) is rendered as
/// plain text.
pub const MAX_NESTING: usize = 64;

/// Markdown to HTML converter driven by a [`Registry`].
///
/// # Example
///
/// ```
/// use kotev_markdown::Engine;
///
/// let engine = Engine::default();
/// assert_eq!(engine.text("# Title\n\nSome *text*"), "<h1>Title</h1>\n<p>Some <em>text</em></p>");
/// ```
pub struct Engine {
    registry: Registry,
}

impl Engine {
    /// Create an engine with the given rules.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// The rules this engine dispatches to.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Check whether a backslash escapes `c`.
    #[must_use]
    pub fn is_escapable(&self, c: char) -> bool {
        self.registry.is_escapable(c)
    }

    /// Convert a Markdown document to an HTML fragment.
    #[must_use]
    pub fn text(&self, markdown: &str) -> String {
        let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
        let lines: Vec<&str> = normalized.trim_matches('\n').split('\n').collect();
        self.render_lines(&lines, 0).trim_matches('\n').to_owned()
    }

    /// Parse lines into block elements.
    #[must_use]
    pub fn blocks<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Element> {
        let mut elements = Vec::new();
        let mut current: Option<Block> = None;

        'lines: for raw in lines {
            let raw = raw.as_ref();
            if raw.chars().all(|c| c == ' ' || c == '\t') {
                if let Some(block) = current.as_mut() {
                    block.interrupted += 1;
                }
                continue;
            }
            let line = Line::new(raw);

            if let Some(block) = current.as_mut()
                && let Some(id) = block.rule
            {
                match self.registry.block_rule(id).resume(&line, block) {
                    Resume::Continue => continue,
                    Resume::End => {
                        if let Some(done) = current.take() {
                            elements.push(self.finish(done));
                        }
                    }
                }
            }

            for id in self.registry.block_candidates(line.marker()) {
                match self.registry.block_rule(id).start(&line, current.as_mut(), self) {
                    Some(BlockStart::Open(mut block)) => {
                        block.rule = Some(id);
                        if let Some(done) = current.replace(block) {
                            elements.push(self.finish(done));
                        }
                        continue 'lines;
                    }
                    Some(BlockStart::Amend) => {
                        if let Some(block) = current.as_mut() {
                            self.check_paragraph(block);
                        }
                        continue 'lines;
                    }
                    None => {}
                }
            }

            match current.as_mut() {
                Some(block) if block.is_open_paragraph() => {
                    block.push_inline("\n");
                    block.push_inline(&line.text);
                }
                _ => {
                    if let Some(done) = current.replace(Block::paragraph(&line.text)) {
                        elements.push(self.finish(done));
                    }
                }
            }
            if let Some(block) = current.as_mut() {
                self.check_paragraph(block);
            }
        }

        if let Some(done) = current {
            elements.push(self.finish(done));
        }
        elements
    }

    /// Parse and render lines as blocks.
    #[must_use]
    pub fn lines<S: AsRef<str>>(&self, lines: &[S]) -> String {
        self.render_lines(lines, 0)
    }

    /// Render inline Markdown.
    #[must_use]
    pub fn line(&self, text: &str) -> String {
        self.render_line(text, 0)
    }

    /// Render an element, parsing any deferred content.
    #[must_use]
    pub fn element(&self, element: &Element) -> String {
        self.render_element(element, 0)
    }

    fn render_lines<S: AsRef<str>>(&self, lines: &[S], depth: usize) -> String {
        if depth > MAX_NESTING {
            tracing::debug!(depth, "Nesting too deep, rendering lines as text");
            return format!("<p>{}</p>", unmarked_text(&join_lines(lines)));
        }
        self.blocks(lines)
            .iter()
            .map(|element| self.render_element(element, depth))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_line(&self, text: &str, depth: usize) -> String {
        if depth > MAX_NESTING {
            tracing::debug!(depth, "Nesting too deep, rendering inline text as is");
            return unmarked_text(text);
        }
        let mut markup = String::new();
        let mut flushed = 0;
        let mut pos = 0;

        while let Some((offset, marker)) = text[pos..]
            .char_indices()
            .find(|&(_, c)| self.registry.has_inline(c))
        {
            let start = pos + offset;
            let excerpt = Excerpt {
                text: &text[start..],
                before: text[..start].chars().next_back(),
            };
            let found = self
                .registry
                .inline_rules(marker)
                .iter()
                .find_map(|rule| rule.parse(&excerpt, self));

            match found {
                Some(found)
                    if found.extent > 0
                        && excerpt.text.len() >= found.extent
                        && excerpt.text.is_char_boundary(found.extent) =>
                {
                    markup.push_str(&unmarked_text(&text[flushed..start]));
                    markup.push_str(&self.render_element(&found.element, depth));
                    pos = start + found.extent;
                    flushed = pos;
                }
                Some(found) => {
                    tracing::debug!(%marker, extent = found.extent, "Ignoring inline match with bad extent");
                    pos = start + marker.len_utf8();
                }
                None => pos = start + marker.len_utf8(),
            }
        }

        markup.push_str(&unmarked_text(&text[flushed..]));
        markup
    }

    fn render_element(&self, element: &Element, depth: usize) -> String {
        let nested = depth + 1;
        let content = match &element.content {
            Content::Empty => None,
            Content::Text(text) => Some(escape_html(text)),
            Content::Inline(text) => Some(self.render_line(text, nested)),
            Content::Lines(lines) => Some(format!("\n{}\n", self.render_lines(lines, nested))),
            Content::TightLines(lines) => Some(self.tight_lines(lines, nested)),
            Content::Elements(children) => {
                let mut markup = String::new();
                for child in children {
                    markup.push('\n');
                    markup.push_str(&self.render_element(child, nested));
                }
                markup.push('\n');
                Some(markup)
            }
            Content::Raw(markup) => Some(markup.clone()),
        };

        if element.name.is_empty() {
            return content.unwrap_or_default();
        }

        let mut markup = format!("<{}", element.name);
        for (name, value) in &element.attrs {
            markup.push_str(&format!(r#" {name}="{}""#, escape_attr(value)));
        }
        if content.is_none() && VOID_ELEMENTS.contains(&element.name.as_str()) {
            markup.push_str(" />");
            return markup;
        }
        markup.push('>');
        markup.push_str(&content.unwrap_or_default());
        markup.push_str(&format!("</{}>", element.name));
        markup
    }

    /// Block-parse list item lines, unwrapping paragraphs.
    fn tight_lines(&self, lines: &[String], depth: usize) -> String {
        if depth > MAX_NESTING {
            tracing::debug!(depth, "Nesting too deep, rendering list item as text");
            return unmarked_text(&join_lines(lines));
        }
        self.blocks(lines)
            .into_iter()
            .map(|element| {
                if element.name == "p" {
                    self.render_element(&Element::fragment(element.content), depth)
                } else {
                    self.render_element(&element, depth)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn finish(&self, mut block: Block) -> Element {
        if let Some(id) = block.rule {
            self.registry.block_rule(id).complete(&mut block);
        }
        block.element
    }

    /// Let paragraph hooks close a paragraph.
    fn check_paragraph(&self, block: &mut Block) {
        if block.kind != BlockKind::Paragraph || block.interrupted > 0 {
            return;
        }
        let Some(text) = block.inline_text() else {
            return;
        };
        if self
            .registry
            .paragraph_hooks()
            .iter()
            .any(|hook| hook.interrupts(text))
        {
            block.interrupted = 1;
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n")
}

/// Escape text no rule claimed and turn marked line ends into breaks.
fn unmarked_text(text: &str) -> String {
    let escaped = escape_text(text);
    HARD_BREAK
        .replace_all(&escaped, "<br />\n")
        .replace(" \n", "\n")
}
