use std::sync::LazyLock;

use regex::Regex;

use super::{Block, BlockKind, BlockRule, BlockStart};
use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::line::Line;

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("invalid heading regex")
});

static SETEXT_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:=+|-+)[ \t]*$").expect("invalid setext regex"));

/// `# Heading` through `###### Heading`.
pub struct AtxHeading;

impl BlockRule for AtxHeading {
    fn start(&self, line: &Line, _current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        if line.indent > 3 {
            return None;
        }
        let caps = ATX_HEADING.captures(&line.text)?;
        let level = caps[1].len();
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();
        let element = Element::new(format!("h{level}"), Content::Inline(text.to_owned()));
        Some(BlockStart::Open(Block::new(BlockKind::Heading, element)))
    }
}

/// A paragraph underlined with `===` or `---`.
pub struct SetextHeading;

impl BlockRule for SetextHeading {
    fn start(&self, line: &Line, current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        let current = current?;
        if !current.is_open_paragraph() || line.indent > 3 || !SETEXT_UNDERLINE.is_match(&line.text) {
            return None;
        }
        current.kind = BlockKind::Heading;
        current.element.name = if line.text.starts_with('=') { "h1" } else { "h2" }.to_owned();
        Some(BlockStart::Amend)
    }
}
