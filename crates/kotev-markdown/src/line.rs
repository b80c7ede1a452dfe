//! Input lines as seen by block rules.

/// Tab stop width.
const TAB_WIDTH: usize = 4;

/// One input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The whole line, tabs expanded.
    pub body: String,
    /// Number of leading spaces.
    pub indent: usize,
    /// The line without its leading spaces.
    pub text: String,
}

impl Line {
    /// Build a line, expanding tabs to the next multiple of four columns.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let body = expand_tabs(raw);
        let indent = body.len() - body.trim_start_matches(' ').len();
        let text = body[indent..].to_owned();
        Self { body, indent, text }
    }

    /// First character of the text, used to pick block rules.
    #[must_use]
    pub fn marker(&self) -> Option<char> {
        self.text.chars().next()
    }

    /// The body with up to `columns` leading spaces removed.
    #[must_use]
    pub fn dedent(&self, columns: usize) -> &str {
        &self.body[self.indent.min(columns)..]
    }
}

fn expand_tabs(raw: &str) -> String {
    if !raw.contains('\t') {
        return raw.to_owned();
    }
    let mut out = String::with_capacity(raw.len() + TAB_WIDTH);
    let mut column = 0;
    for c in raw.chars() {
        if c == '\t' {
            let shortage = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', shortage));
            column += shortage;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
