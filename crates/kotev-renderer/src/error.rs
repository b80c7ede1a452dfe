//! Error types for rendering.

use kotev_dom::DomError;

/// Error from [`Renderer::render`](crate::Renderer::render).
///
/// Dialect input never fails to render; these are raw HTML the tree parser
/// cannot read, or broken internal invariants.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Intermediate markup could not be parsed or serialized.
    #[error("markup error: {0}")]
    Markup(#[from] DomError),

    /// A placeholder refers to no protected region.
    #[error("unknown placeholder id {0}")]
    UnknownPlaceholder(usize),
}
