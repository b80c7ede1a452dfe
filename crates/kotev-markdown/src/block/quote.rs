use super::{Block, BlockKind, BlockRule, BlockStart, Resume};
use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::line::Line;

/// `> quoted` lines, block-parsed recursively.
///
/// Lines without a `>` continue the quote lazily until a blank line.
pub struct BlockQuote;

fn strip_marker(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

impl BlockRule for BlockQuote {
    fn start(&self, line: &Line, _current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        if line.indent > 3 {
            return None;
        }
        let rest = strip_marker(&line.text)?;
        let element = Element::new("blockquote", Content::Lines(vec![rest.to_owned()]));
        Some(BlockStart::Open(Block::new(BlockKind::Quote, element)))
    }

    fn resume(&self, line: &Line, block: &mut Block) -> Resume {
        let Content::Lines(lines) = &mut block.element.content else {
            return Resume::End;
        };
        if let Some(rest) = strip_marker(&line.text) {
            if block.interrupted > 0 {
                // A blank line ends the quote unless the next line is
                // quoted again, in which case the blank becomes part of it.
                lines.extend(std::iter::repeat_n(String::new(), block.interrupted));
                block.interrupted = 0;
            }
            lines.push(rest.to_owned());
            return Resume::Continue;
        }
        if block.interrupted == 0 {
            lines.push(line.text.clone());
            return Resume::Continue;
        }
        Resume::End
    }
}
