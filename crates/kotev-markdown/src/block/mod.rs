//! Block-level rules.
//!
//! The engine feeds lines one at a time. A rule registered for a line's
//! first character may open a new [`Block`] (or edit the block that is
//! currently open). An open block gets the first look at each following
//! line through [`BlockRule::resume`] until it declines.

mod code;
mod heading;
mod list;
mod markup;
mod quote;
mod thematic;

pub use code::{FencedCode, IndentedCode};
pub use heading::{AtxHeading, SetextHeading};
pub use list::List;
pub use markup::{HtmlBlock, TEXT_LEVEL_ELEMENTS};
pub use quote::BlockQuote;
pub use thematic::ThematicBreak;

use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::line::Line;

/// Kind of an open block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    ThematicBreak,
    Quote,
    FencedCode,
    IndentedCode,
    List,
    Html,
    /// Block opened by a rule outside this crate.
    Custom(&'static str),
}

/// Rule-specific continuation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlockState {
    #[default]
    None,
    Code {
        text: String,
    },
    Fence {
        marker: char,
        len: usize,
        indent: usize,
        language: String,
        text: String,
        closed: bool,
    },
    List {
        ordered: bool,
        marker: char,
        content_indent: usize,
        loose: bool,
    },
    Html {
        tag: String,
        depth: usize,
        closed: bool,
    },
}

/// A block under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub element: Element,
    /// Blank lines seen since the block's last line.
    pub interrupted: usize,
    pub state: BlockState,
    pub(crate) rule: Option<usize>,
}

impl Block {
    /// Create a block around an element.
    #[must_use]
    pub fn new(kind: BlockKind, element: Element) -> Self {
        Self {
            kind,
            element,
            interrupted: 0,
            state: BlockState::None,
            rule: None,
        }
    }

    /// Attach continuation state.
    #[must_use]
    pub fn with_state(mut self, state: BlockState) -> Self {
        self.state = state;
        self
    }

    /// Create a paragraph from its first line.
    #[must_use]
    pub fn paragraph(text: &str) -> Self {
        Self::new(
            BlockKind::Paragraph,
            Element::new("p", Content::Inline(text.to_owned())),
        )
    }

    /// Check if this is a paragraph still accepting lines.
    #[must_use]
    pub fn is_open_paragraph(&self) -> bool {
        self.kind == BlockKind::Paragraph && self.interrupted == 0
    }

    /// Raw inline content of the block's element, if it has any.
    #[must_use]
    pub fn inline_text(&self) -> Option<&str> {
        match &self.element.content {
            Content::Inline(text) => Some(text),
            _ => None,
        }
    }

    /// Append to the raw inline content of the block's element.
    ///
    /// Does nothing if the element has no inline content.
    pub fn push_inline(&mut self, text: &str) {
        if let Content::Inline(existing) = &mut self.element.content {
            existing.push_str(text);
        }
    }
}

/// Outcome of [`BlockRule::start`].
#[derive(Debug)]
pub enum BlockStart {
    /// Close the current block and open this one.
    Open(Block),
    /// The rule edited the current block in place; it stays open.
    Amend,
}

/// Outcome of [`BlockRule::resume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// The line belongs to the block.
    Continue,
    /// The block is finished; the line is handled afresh.
    End,
}

/// Recognizer for one kind of block.
pub trait BlockRule: Send + Sync {
    /// Try to start a block at `line`.
    ///
    /// `current` is the block that is open right now, if any.
    fn start(&self, line: &Line, current: Option<&mut Block>, engine: &Engine) -> Option<BlockStart>;

    /// Offer the next non-blank line to a block this rule opened.
    fn resume(&self, _line: &Line, _block: &mut Block) -> Resume {
        Resume::End
    }

    /// Finish a block this rule opened.
    fn complete(&self, _block: &mut Block) {}
}

/// Check run on a paragraph after each line it takes in.
///
/// Returning `true` closes the paragraph so the next line starts a new block.
pub trait ParagraphHook: Send + Sync {
    fn interrupts(&self, text: &str) -> bool;
}

/// Repeated blank lines re-added to a block that accepts them.
pub(crate) fn blank_lines(block: &mut Block) -> String {
    "\n".repeat(std::mem::take(&mut block.interrupted))
}
