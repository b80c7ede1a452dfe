//! Output elements produced by block and inline rules.

/// Content of an [`Element`].
///
/// Deferred variants ([`Inline`](Content::Inline), [`Lines`](Content::Lines),
/// [`TightLines`](Content::TightLines)) hold raw Markdown that the engine
/// parses when the element is rendered, so rules never call back into the
/// engine to produce nested markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// No content.
    Empty,
    /// Literal text, HTML-escaped on output.
    Text(String),
    /// Raw Markdown parsed as inline content.
    Inline(String),
    /// Raw Markdown lines parsed as blocks.
    Lines(Vec<String>),
    /// Raw Markdown lines parsed as blocks, with paragraph wrappers removed.
    TightLines(Vec<String>),
    /// Child elements, one per line.
    Elements(Vec<Element>),
    /// Markup emitted verbatim.
    Raw(String),
}

/// An HTML element waiting to be rendered.
///
/// An element with an empty name renders its content only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes in output order.
    pub attrs: Vec<(String, String)>,
    /// Element content.
    pub content: Content,
}

impl Element {
    /// Create an element with the given content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            content,
        }
    }

    /// Create a nameless element that renders only its content.
    #[must_use]
    pub fn fragment(content: Content) -> Self {
        Self::new(String::new(), content)
    }

    /// Create a nameless element holding literal text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::fragment(Content::Text(text.into()))
    }

    /// Create a nameless element holding verbatim markup.
    #[must_use]
    pub fn raw(markup: impl Into<String>) -> Self {
        Self::fragment(Content::Raw(markup.into()))
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }
}
