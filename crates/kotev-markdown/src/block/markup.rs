use std::sync::LazyLock;

use regex::Regex;

use super::{Block, BlockKind, BlockRule, BlockStart, BlockState, Resume, blank_lines};
use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::escape::VOID_ELEMENTS;
use crate::line::Line;

/// Elements that sit inside paragraphs rather than starting a block.
pub const TEXT_LEVEL_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em", "i", "img",
    "ins", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span", "strike",
    "strong", "sub", "sup", "time", "tt", "u", "var", "wbr", "x-attrs",
];

static OPENING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9-]*)(?:\s[^>]*)?>").expect("invalid opening tag regex")
});

/// Count opening and closing tags named `name` in `text`.
fn count_tags(text: &str, name: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    for (pos, _) in text.match_indices('<') {
        let rest = &text[pos + 1..];
        let (closing, rest) = match rest.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let Some(after) = rest
            .get(..name.len())
            .filter(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(|_| &rest[name.len()..])
        else {
            continue;
        };
        if !after.starts_with(['>', ' ', '\t', '/']) && !after.is_empty() {
            continue;
        }
        if closing {
            closes += 1;
        } else if !after.trim_start().starts_with("/>") {
            opens += 1;
        }
    }
    (opens, closes)
}

/// Raw HTML blocks, passed through verbatim.
///
/// A block opened by `<tag ...>` runs until its matching `</tag>`, blank
/// lines included; nested elements of the same name are balanced. HTML
/// comments run until `-->`.
pub struct HtmlBlock;

impl BlockRule for HtmlBlock {
    fn start(&self, line: &Line, _current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        if line.indent > 3 {
            return None;
        }

        if line.text.starts_with("<!--") {
            let closed = line.text.contains("-->");
            let block = Block::new(BlockKind::Html, Element::raw(line.body.clone())).with_state(
                BlockState::Html {
                    tag: String::new(),
                    depth: 0,
                    closed,
                },
            );
            return Some(BlockStart::Open(block));
        }

        let caps = OPENING_TAG.captures(&line.text)?;
        let tag = caps[1].to_ascii_lowercase();
        if TEXT_LEVEL_ELEMENTS.contains(&tag.as_str()) {
            return None;
        }

        let (depth, closed) = if VOID_ELEMENTS.contains(&tag.as_str()) {
            (0, true)
        } else {
            let (opens, closes) = count_tags(&line.text, &tag);
            let depth = opens.saturating_sub(closes);
            (depth, depth == 0)
        };
        let block = Block::new(BlockKind::Html, Element::raw(line.body.clone()))
            .with_state(BlockState::Html { tag, depth, closed });
        Some(BlockStart::Open(block))
    }

    fn resume(&self, line: &Line, block: &mut Block) -> Resume {
        let blanks = blank_lines(block);
        let BlockState::Html { tag, depth, closed } = &mut block.state else {
            return Resume::End;
        };
        let Content::Raw(markup) = &mut block.element.content else {
            return Resume::End;
        };
        if *closed {
            return Resume::End;
        }

        markup.push_str(&blanks);
        markup.push('\n');
        markup.push_str(&line.body);

        if tag.is_empty() {
            *closed = line.text.contains("-->");
        } else {
            let (opens, closes) = count_tags(&line.text, tag);
            *depth = (*depth + opens).saturating_sub(closes);
            *closed = *depth == 0;
        }
        Resume::Continue
    }
}
