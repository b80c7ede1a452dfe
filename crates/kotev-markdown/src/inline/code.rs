use super::{Excerpt, InlineMatch, InlineRule};
use crate::element::{Content, Element};
use crate::engine::Engine;

/// Backtick code spans. The closing run must be as long as the opening one.
pub struct CodeSpan;

impl InlineRule for CodeSpan {
    fn parse(&self, excerpt: &Excerpt<'_>, _engine: &Engine) -> Option<InlineMatch> {
        let text = excerpt.text;
        let run = text.bytes().take_while(|&b| b == b'`').count();
        if run == 0 {
            return None;
        }

        let mut pos = run;
        while pos < text.len() {
            let offset = text[pos..].find('`')?;
            let start = pos + offset;
            let len = text[start..].bytes().take_while(|&b| b == b'`').count();
            if len == run {
                let code = text[run..start].replace('\n', " ");
                let code = code.trim();
                if code.is_empty() {
                    return None;
                }
                let element = Element::new("code", Content::Text(code.to_owned()));
                return Some(InlineMatch::new(start + len, element));
            }
            pos = start + len;
        }
        None
    }
}
