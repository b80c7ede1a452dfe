//! Block rules for `--` source footers and lone attribute lines.

use std::sync::LazyLock;

use kotev_dom::{SOURCE_CLASS, SOURCE_FOOTER_TAG};
use kotev_markdown::{
    Block, BlockKind, BlockRule, BlockStart, Content, Element, Engine, Line, ParagraphHook, Resume,
};
use regex::Regex;

use super::inline::is_attribute_line;

static SOURCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--[ ]*(.+)").expect("invalid source line regex"));

/// Block kind of an open source footer.
pub const SOURCE_BLOCK: BlockKind = BlockKind::Custom("source");

/// `--Author` lines: a source citation footer.
///
/// Right after an open paragraph the footer is rendered straight into the
/// paragraph, since a paragraph cannot hold blocks. Otherwise it opens its
/// own block, and following `--` lines are appended to it.
pub struct SourceFooter;

fn footer(text: &str) -> Element {
    Element::new(SOURCE_FOOTER_TAG, Content::Inline(text.to_owned())).with_attr("class", SOURCE_CLASS)
}

impl BlockRule for SourceFooter {
    fn start(&self, line: &Line, current: Option<&mut Block>, engine: &Engine) -> Option<BlockStart> {
        let caps = SOURCE_LINE.captures(&line.text)?;
        let element = footer(&caps[1]);

        if let Some(block) = current
            && block.is_open_paragraph()
        {
            block.push_inline(&format!("\n{}", engine.element(&element)));
            return Some(BlockStart::Amend);
        }
        Some(BlockStart::Open(Block::new(SOURCE_BLOCK, element)))
    }

    fn resume(&self, line: &Line, block: &mut Block) -> Resume {
        if block.interrupted > 0 {
            return Resume::End;
        }
        match SOURCE_LINE.captures(&line.text) {
            Some(caps) => {
                block.push_inline(&caps[1]);
                Resume::Continue
            }
            None => Resume::End,
        }
    }
}

/// Closes a paragraph made of a single `{: ... }` marker.
///
/// The marker then sits in a paragraph of its own and the next line starts
/// a fresh block, which the post-processor hands the attributes to.
pub struct AttributeLine;

impl ParagraphHook for AttributeLine {
    fn interrupts(&self, text: &str) -> bool {
        is_attribute_line(text)
    }
}

#[cfg(test)]
mod tests {
    use kotev_markdown::Registry;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialect::inline::AttributeMarker;

    fn render(markdown: &str) -> String {
        let mut registry = Registry::standard();
        registry.add_inline('{', AttributeMarker);
        registry.add_block("-", SourceFooter);
        registry.add_paragraph_hook(AttributeLine);
        Engine::new(registry).text(markdown)
    }

    #[test]
    fn test_footer_block() {
        assert_eq!(
            render("--Rabbi Akiva"),
            r#"<footer class="source">Rabbi Akiva</footer>"#
        );
    }

    #[test]
    fn test_footer_continuation_concatenates() {
        assert_eq!(
            render("-- Rabbi\n-- Akiva"),
            r#"<footer class="source">RabbiAkiva</footer>"#
        );
    }

    #[test]
    fn test_footer_ends_at_blank_line() {
        assert_eq!(
            render("--one\n\n--two"),
            "<footer class=\"source\">one</footer>\n<footer class=\"source\">two</footer>"
        );
    }

    #[test]
    fn test_footer_ends_at_other_line() {
        assert_eq!(
            render("--one\ntext"),
            "<footer class=\"source\">one</footer>\n<p>text</p>"
        );
    }

    #[test]
    fn test_footer_after_paragraph_joins_it() {
        assert_eq!(
            render("quoted words\n--*Someone*"),
            "<p>quoted words\n<footer class=\"source\"><em>Someone</em></footer></p>"
        );
    }

    #[test]
    fn test_footer_inside_blockquote() {
        assert_eq!(
            render("> text\n--Rabbi Akiva"),
            "<blockquote>\n<p>text\n<footer class=\"source\">Rabbi Akiva</footer></p>\n</blockquote>"
        );
    }

    #[test]
    fn test_dashes_still_mean_rules_and_headings() {
        assert_eq!(render("---"), "<hr />");
        assert_eq!(render("Title\n--"), "<h2>Title</h2>");
        assert_eq!(render("- item"), "<ul>\n<li>item</li>\n</ul>");
    }

    #[test]
    fn test_attribute_line_closes_paragraph() {
        assert_eq!(
            render("{: .wide}\ntext"),
            "<p><x-attrs class=\"wide\"></x-attrs></p>\n<p>text</p>"
        );
    }

    #[test]
    fn test_marker_inside_paragraph_does_not_close_it() {
        assert_eq!(
            render("text\n{: .wide}\nmore"),
            "<p>text\n<x-attrs class=\"wide\"></x-attrs>more</p>"
        );
    }
}
