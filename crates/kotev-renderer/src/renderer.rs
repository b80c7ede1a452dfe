//! The conversion pipeline.

use kotev_dom::{HtmlParser, HtmlSerializer, NodeData, NodeId, Tree};
use kotev_markdown::Engine;

use crate::dialect::dialect_registry;
use crate::error::RenderError;
use crate::postprocess::{OrphanPolicy, hoist_attributes, restructure_footers};
use crate::protect::{ProtectedRegions, strip_sentinels};
use crate::punctuation;

/// Attributes that ask for an element's content to be rendered as Markdown.
pub const MARKDOWN_ATTRIBUTES: &[&str] = &["markdown", "md"];

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// `lang` of `/italic/` text.
    pub italic_lang: String,
    /// Apply smart quotes, dashes and ellipses.
    pub smart_punctuation: bool,
    /// Deepest nesting of `markdown`-flagged elements that is rendered.
    pub max_depth: usize,
    /// What happens to attribute markers with no element after them.
    pub orphan_policy: OrphanPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            italic_lang: "he".to_owned(),
            smart_punctuation: true,
            max_depth: 8,
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn with_italic_lang(mut self, lang: impl Into<String>) -> Self {
        self.italic_lang = lang.into();
        self
    }

    #[must_use]
    pub fn with_smart_punctuation(mut self, enabled: bool) -> Self {
        self.smart_punctuation = enabled;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }
}

/// Dialect Markdown to HTML renderer.
///
/// Each call runs the engine with the dialect rules, parses the result into
/// a tree, restructures source footers, hoists attribute markers, renders
/// `markdown`-flagged elements recursively and finally applies smart
/// punctuation. Calls share no state and the renderer is `Sync`.
///
/// # Example
///
/// ```
/// use kotev_renderer::{RenderOptions, Renderer};
///
/// let renderer = Renderer::new(RenderOptions::default());
/// let html = renderer.render("/שלום/ and _A Citation_").unwrap();
/// assert_eq!(html, r#"<p><i lang="he">שלום</i> and <cite>A Citation</cite></p>"#);
/// ```
pub struct Renderer {
    engine: Engine,
    options: RenderOptions,
    parser: HtmlParser,
    serializer: HtmlSerializer,
}

impl Renderer {
    /// Create a renderer.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            engine: Engine::new(dialect_registry(&options.italic_lang)),
            options,
            parser: HtmlParser::new(),
            serializer: HtmlSerializer::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a dialect document to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Markup`] if raw HTML in the document cannot be
    /// parsed. Dialect syntax itself never fails.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        self.render_at_depth(markdown, 0)
    }

    /// Render a document nested `depth` levels inside `markdown`-flagged
    /// elements.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_at_depth(&self, markdown: &str, depth: usize) -> Result<String, RenderError> {
        let markdown = strip_sentinels(markdown);
        let html = self.engine.text(&markdown);

        let mut tree = self.parser.parse(&html)?;
        let footers = restructure_footers(&mut tree);
        let markers = hoist_attributes(&mut tree, self.options.orphan_policy);

        let mut regions = ProtectedRegions::new();
        let nested = self.render_nested(&mut tree, depth, &mut regions)?;

        let mut html = self.serializer.serialize(&tree)?;
        if self.options.smart_punctuation {
            html = punctuation::apply(&html, &mut regions);
        }
        let html = regions.restore(&html)?;

        tracing::debug!(depth, footers, markers, nested, "Rendered document");
        Ok(html.trim_matches('\n').to_owned())
    }

    /// Replace the content of `markdown`-flagged elements with its rendering.
    ///
    /// Only the outermost flagged elements are rendered here; flags further
    /// down are handled by the nested call. The rendered content is stored
    /// in `regions` so later passes leave it alone.
    fn render_nested(
        &self,
        tree: &mut Tree,
        depth: usize,
        regions: &mut ProtectedRegions,
    ) -> Result<usize, RenderError> {
        let flagged = tree.find(|data| match data {
            NodeData::Element { attrs, .. } => {
                MARKDOWN_ATTRIBUTES.iter().any(|name| attrs.contains(name))
            }
            _ => false,
        });

        let mut rendered = 0;
        for node in flagged {
            if !is_attached(tree, node) {
                continue;
            }
            if let Some(attrs) = tree.attrs_mut(node) {
                for name in MARKDOWN_ATTRIBUTES {
                    attrs.remove(name);
                }
            }
            if depth >= self.options.max_depth {
                tracing::warn!(
                    depth,
                    tag = tree.tag(node).unwrap_or_default(),
                    "Markdown nesting too deep, leaving content as is"
                );
                continue;
            }

            let inner = self.serializer.serialize_children(tree, node)?;
            let html = self.render_at_depth(&inner, depth + 1)?;
            let token = regions.protect(html);
            tree.clear_children(node);
            let text = tree.create_text(token);
            tree.append(node, text);
            rendered += 1;
        }
        Ok(rendered)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Check that a node is still reachable from the root.
fn is_attached(tree: &Tree, node: NodeId) -> bool {
    tree.ancestors(node).last() == Some(tree.root())
}
