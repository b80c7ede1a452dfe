use super::{Block, BlockKind, BlockRule, BlockStart};
use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::line::Line;

/// Check for three or more `-`, `*` or `_`, optionally spaced.
pub(crate) fn is_thematic_break(line: &Line) -> bool {
    let Some(marker) = line.marker() else {
        return false;
    };
    if line.indent > 3 || !matches!(marker, '-' | '*' | '_') {
        return false;
    }
    let mut count = 0;
    for c in line.text.chars() {
        match c {
            c if c == marker => count += 1,
            ' ' | '\t' => {}
            _ => return false,
        }
    }
    count >= 3
}

/// `---`, `***` or `___`.
pub struct ThematicBreak;

impl BlockRule for ThematicBreak {
    fn start(&self, line: &Line, _current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        is_thematic_break(line).then(|| {
            BlockStart::Open(Block::new(
                BlockKind::ThematicBreak,
                Element::new("hr", Content::Empty),
            ))
        })
    }
}
