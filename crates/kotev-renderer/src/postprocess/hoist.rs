//! Attribute markers hand their attributes to a neighbouring element.

use kotev_dom::{NodeData, NodeId, Tree};

/// Elements that receive the attributes aimed at a paragraph wrapping only them.
const EMBEDDED_ELEMENTS: &[&str] = &[
    "img", "picture", "video", "audio", "iframe", "embed", "object", "svg",
];

/// What to do with a marker that has no element after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrphanPolicy {
    /// Apply the attributes to the enclosing element.
    #[default]
    Parent,
    /// Discard the attributes.
    Drop,
}

/// Move the attributes of every marker onto its target and delete the markers.
///
/// A marker alone in a paragraph first replaces that paragraph. The target
/// is then the first element after the marker; when that is a paragraph
/// around a single image or other embedded element, the embedded element.
/// Without a following element `policy` decides.
///
/// Returns the number of markers consumed.
pub fn hoist_attributes(tree: &mut Tree, policy: OrphanPolicy) -> usize {
    let markers = tree.find(|data| matches!(data, NodeData::Marker(_)));
    for &marker in &markers {
        hoist(tree, marker, policy);
    }
    markers.len()
}

fn hoist(tree: &mut Tree, marker: NodeId, policy: OrphanPolicy) {
    let Some(parent) = tree.parent(marker) else {
        return;
    };

    // Content parsed into the marker belongs after it
    for child in tree.children(marker).to_vec().into_iter().rev() {
        tree.insert_after(marker, child);
    }

    if tree.is_element_named(parent, "p") && is_sole_content(tree, parent, marker) {
        tree.copy_attributes(parent, marker);
        tree.replace(parent, marker);
    }

    let following = tree
        .following_siblings(marker)
        .iter()
        .copied()
        .find(|&node| tree.is_element_like(node));

    let target = match (following, policy) {
        (Some(node), _) => Some(embedded_target(tree, node)),
        (None, OrphanPolicy::Parent) => tree.parent(marker).filter(|&node| node != tree.root()),
        (None, OrphanPolicy::Drop) => None,
    };

    match target {
        Some(target) => {
            let copied = tree.copy_attributes(marker, target);
            tracing::debug!(tag = tree.tag(target).unwrap_or_default(), copied, "Hoisted attributes");
        }
        None => tracing::debug!("Dropping attributes of marker without a target"),
    }
    tree.detach(marker);
}

/// Check that `node` is the only non-blank child of `parent`.
fn is_sole_content(tree: &Tree, parent: NodeId, node: NodeId) -> bool {
    tree.children(parent)
        .iter()
        .all(|&child| child == node || tree.is_blank_text(child))
}

/// Descend from a paragraph into the one embedded element it wraps.
fn embedded_target(tree: &Tree, node: NodeId) -> NodeId {
    if !tree.is_element_named(node, "p") {
        return node;
    }
    let mut content = tree
        .children(node)
        .iter()
        .copied()
        .filter(|&child| !tree.is_blank_text(child));
    match (content.next(), content.next()) {
        (Some(only), None)
            if EMBEDDED_ELEMENTS
                .iter()
                .any(|tag| tree.is_element_named(only, tag)) =>
        {
            only
        }
        _ => node,
    }
}
