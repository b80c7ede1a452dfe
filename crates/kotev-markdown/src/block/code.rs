use super::{Block, BlockKind, BlockRule, BlockStart, BlockState, Resume, blank_lines};
use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::escape::{escape_attr, escape_html};
use crate::line::Line;

/// Minimum indentation of an indented code line.
const CODE_INDENT: usize = 4;

/// Build `<pre>` content for a finished code block.
///
/// `text` holds one `\n`-terminated entry per line.
fn code_markup(text: &str, language: Option<&str>) -> String {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let class = language.map_or_else(String::new, |lang| {
        format!(r#" class="language-{}""#, escape_attr(lang))
    });
    format!("<code{class}>{}</code>", escape_html(text))
}

/// Code fenced with three or more backticks or tildes.
pub struct FencedCode;

impl BlockRule for FencedCode {
    fn start(&self, line: &Line, _current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        let marker = line.marker()?;
        if line.indent > 3 || !matches!(marker, '`' | '~') {
            return None;
        }
        let len = line.text.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }
        let info = line.text[len..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }
        let language = info.split_whitespace().next().unwrap_or_default();

        let element = Element::new("pre", Content::Empty);
        let block = Block::new(BlockKind::FencedCode, element).with_state(BlockState::Fence {
            marker,
            len,
            indent: line.indent,
            language: language.to_owned(),
            text: String::new(),
            closed: false,
        });
        Some(BlockStart::Open(block))
    }

    fn resume(&self, line: &Line, block: &mut Block) -> Resume {
        let blanks = blank_lines(block);
        let BlockState::Fence {
            marker,
            len,
            indent,
            text,
            closed,
            ..
        } = &mut block.state
        else {
            return Resume::End;
        };
        if *closed {
            return Resume::End;
        }
        text.push_str(&blanks);

        let run = line.text.chars().take_while(|c| *c == *marker).count();
        if line.indent <= 3 && run >= *len && line.text[run..].trim().is_empty() {
            *closed = true;
            return Resume::Continue;
        }
        text.push_str(line.dedent(*indent));
        text.push('\n');
        Resume::Continue
    }

    fn complete(&self, block: &mut Block) {
        if let BlockState::Fence { text, language, .. } = &block.state {
            let language = (!language.is_empty()).then_some(language.as_str());
            block.element.content = Content::Raw(code_markup(text, language));
        }
    }
}

/// Lines indented by four or more spaces.
///
/// Cannot interrupt a paragraph.
pub struct IndentedCode;

impl BlockRule for IndentedCode {
    fn start(&self, line: &Line, current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        if line.indent < CODE_INDENT || current.is_some_and(|block| block.is_open_paragraph()) {
            return None;
        }
        let block = Block::new(BlockKind::IndentedCode, Element::new("pre", Content::Empty))
            .with_state(BlockState::Code {
                text: format!("{}\n", line.dedent(CODE_INDENT)),
            });
        Some(BlockStart::Open(block))
    }

    fn resume(&self, line: &Line, block: &mut Block) -> Resume {
        if line.indent < CODE_INDENT {
            return Resume::End;
        }
        let blanks = blank_lines(block);
        let BlockState::Code { text } = &mut block.state else {
            return Resume::End;
        };
        text.push_str(&blanks);
        text.push_str(line.dedent(CODE_INDENT));
        text.push('\n');
        Resume::Continue
    }

    fn complete(&self, block: &mut Block) {
        if let BlockState::Code { text } = &block.state {
            block.element.content = Content::Raw(code_markup(text, None));
        }
    }
}
