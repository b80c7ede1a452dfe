//! Inline rules.
//!
//! While scanning a line the engine stops at every character that has rules
//! registered for it and offers each rule, in order, an [`Excerpt`] starting
//! at that character. The first [`InlineMatch`] wins; text the rules did not
//! claim is escaped and emitted as is.

mod code;
mod emphasis;
mod escape;
mod link;
mod markup;

pub use code::CodeSpan;
pub use emphasis::{Emphasis, Strikethrough};
pub use escape::Escape;
pub use link::{Image, Link};
pub use markup::{Autolink, InlineMarkup};

use crate::element::Element;
use crate::engine::Engine;

/// The text a rule is offered.
#[derive(Debug, Clone, Copy)]
pub struct Excerpt<'a> {
    /// Text from the trigger character to the end of the line.
    pub text: &'a str,
    /// Character right before the trigger, if any.
    pub before: Option<char>,
}

/// A successful inline match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    /// Number of bytes of [`Excerpt::text`] consumed.
    pub extent: usize,
    pub element: Element,
}

impl InlineMatch {
    #[must_use]
    pub fn new(extent: usize, element: Element) -> Self {
        Self { extent, element }
    }
}

/// Recognizer for one inline construct.
pub trait InlineRule: Send + Sync {
    /// Try to match at the start of `excerpt`.
    fn parse(&self, excerpt: &Excerpt<'_>, engine: &Engine) -> Option<InlineMatch>;
}
