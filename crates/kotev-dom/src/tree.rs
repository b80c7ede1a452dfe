//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by the [`Tree`]; children are ordered
//! lists of [`NodeId`]s and every node keeps a non-owning `parent` index.
//! Detached nodes stay in the arena but are unreachable from the root, so
//! "deleting" a node is just detaching it.

use crate::attrs::Attributes;

/// Tag name used in intermediate markup for attribute markers.
pub const MARKER_TAG: &str = "x-attrs";

/// Tag name of source footers.
pub const SOURCE_FOOTER_TAG: &str = "footer";

/// Class that turns a `footer` into a source footer.
pub const SOURCE_CLASS: &str = "source";

/// Tag name of the synthetic root element.
pub(crate) const ROOT_TAG: &str = "root";

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);
}

/// Payload of a tree node.
///
/// `Marker` and `SourceFooter` are transient: the post-processor consumes
/// them, and the serializer refuses to write them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Regular element.
    Element {
        /// Lowercase tag name.
        tag: String,
        /// Attributes in document order.
        attrs: Attributes,
    },
    /// Literal text (unescaped).
    Text(String),
    /// HTML comment body.
    Comment(String),
    /// Pending attributes waiting to be hoisted onto another element.
    Marker(Attributes),
    /// Source citation footer waiting to become a `figcaption`.
    SourceFooter(Attributes),
}

impl NodeData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Attributes::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Document tree with a synthetic root element.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the root element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::element(ROOT_TAG),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Create a detached node.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached element with no attributes.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create(NodeData::element(tag))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeData::Text(text.into()))
    }

    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0].data
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Tag name of an element-like node.
    ///
    /// Markers report [`MARKER_TAG`], source footers [`SOURCE_FOOTER_TAG`].
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Marker(_) => Some(MARKER_TAG),
            NodeData::SourceFooter(_) => Some(SOURCE_FOOTER_TAG),
            NodeData::Text(_) | NodeData::Comment(_) => None,
        }
    }

    /// Check whether the node is a regular element with the given tag.
    #[must_use]
    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        matches!(self.data(id), NodeData::Element { tag, .. } if tag == name)
    }

    /// Check whether the node can carry attributes.
    #[must_use]
    pub fn is_element_like(&self, id: NodeId) -> bool {
        self.attrs(id).is_some()
    }

    /// Check whether the node is text made only of whitespace.
    #[must_use]
    pub fn is_blank_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), NodeData::Text(text) if text.trim().is_empty())
    }

    #[must_use]
    pub fn attrs(&self, id: NodeId) -> Option<&Attributes> {
        match self.data(id) {
            NodeData::Element { attrs, .. }
            | NodeData::Marker(attrs)
            | NodeData::SourceFooter(attrs) => Some(attrs),
            NodeData::Text(_) | NodeData::Comment(_) => None,
        }
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Attributes> {
        match self.data_mut(id) {
            NodeData::Element { attrs, .. }
            | NodeData::Marker(attrs)
            | NodeData::SourceFooter(attrs) => Some(attrs),
            NodeData::Text(_) | NodeData::Comment(_) => None,
        }
    }

    /// Copy every attribute of `from` onto `to`, overwriting same-named ones.
    ///
    /// Names the target cannot hold are skipped. Returns the number copied.
    pub fn copy_attributes(&mut self, from: NodeId, to: NodeId) -> usize {
        let Some(source) = self.attrs(from).cloned() else {
            return 0;
        };
        let Some(target) = self.attrs_mut(to) else {
            return 0;
        };
        let mut copied = 0;
        for (name, value) in source.iter() {
            if target.set(name, value) {
                copied += 1;
            } else {
                tracing::debug!(name, "Skipping attribute with illegal name");
            }
        }
        copied
    }

    /// Detach a node from its parent. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `node` right before `sibling`.
    ///
    /// Does nothing if `sibling` is detached.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        self.detach(node);
        let pos = self.index_in_parent(sibling).unwrap_or(0);
        self.nodes[parent.0].children.insert(pos, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// Insert `node` right after `sibling`.
    ///
    /// Does nothing if `sibling` is detached.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        self.detach(node);
        let pos = self.index_in_parent(sibling).map_or(0, |pos| pos + 1);
        self.nodes[parent.0].children.insert(pos, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        self.insert_before(old, new);
        self.detach(old);
    }

    /// Move all children of `from` to the end of `to`, keeping their order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for child in children {
            self.nodes[child.0].parent = Some(to);
            self.nodes[to.0].children.push(child);
        }
    }

    /// Remove all children of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Ancestors of a node, nearest first. The node itself is not included.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&node| self.parent(node))
    }

    /// Siblings after a node, in order.
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> &[NodeId] {
        match (self.parent(id), self.index_in_parent(id)) {
            (Some(parent), Some(pos)) => &self.children(parent)[pos + 1..],
            _ => &[],
        }
    }

    /// Sibling right before a node.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let pos = self.index_in_parent(id)?;
        pos.checked_sub(1).map(|prev| self.children(parent)[prev])
    }

    /// All descendants of a node in document order, excluding the node itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Nodes reachable from the root that satisfy `predicate`, in document order.
    pub fn find(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| predicate(self.data(id)))
            .collect()
    }

    /// Concatenated text of a node's subtree.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeData::Text(text) = self.data(id) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let NodeData::Text(text) = self.data(node) {
                out.push_str(text);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(tree: &mut Tree, text: &str) -> NodeId {
        let p = tree.create_element("p");
        let t = tree.create_text(text);
        tree.append(p, t);
        p
    }

    #[test]
    fn test_append_sets_parent() {
        let mut tree = Tree::new();
        let p = paragraph(&mut tree, "Hello");
        tree.append(tree.root(), p);

        assert_eq!(tree.parent(p), Some(tree.root()));
        assert_eq!(tree.children(tree.root()), &[p]);
        assert_eq!(tree.text_content(p), "Hello");
    }

    #[test]
    fn test_insert_before_and_replace() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = paragraph(&mut tree, "a");
        let b = paragraph(&mut tree, "b");
        tree.append(root, b);
        tree.insert_before(b, a);
        assert_eq!(tree.children(root), &[a, b]);

        let c = paragraph(&mut tree, "c");
        tree.replace(a, c);
        assert_eq!(tree.children(root), &[c, b]);
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn test_insert_after() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = paragraph(&mut tree, "a");
        let c = paragraph(&mut tree, "c");
        tree.append(root, a);
        tree.append(root, c);
        let b = paragraph(&mut tree, "b");
        tree.insert_after(a, b);
        assert_eq!(tree.children(root), &[a, b, c]);
    }

    #[test]
    fn test_append_moves_from_old_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let quote = tree.create_element("blockquote");
        let figure = tree.create_element("figure");
        tree.append(root, quote);
        tree.append(root, figure);

        tree.append(figure, quote);
        assert_eq!(tree.children(root), &[figure]);
        assert_eq!(tree.parent(quote), Some(figure));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut tree = Tree::new();
        let root = tree.root();
        let quote = tree.create_element("blockquote");
        let p = paragraph(&mut tree, "x");
        tree.append(root, quote);
        tree.append(quote, p);
        let text = tree.children(p)[0];

        let chain: Vec<_> = tree.ancestors(text).collect();
        assert_eq!(chain, vec![p, quote, root]);
    }

    #[test]
    fn test_following_siblings() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = paragraph(&mut tree, "a");
        let b = paragraph(&mut tree, "b");
        let c = paragraph(&mut tree, "c");
        for node in [a, b, c] {
            tree.append(root, node);
        }
        assert_eq!(tree.following_siblings(a), &[b, c]);
        assert!(tree.following_siblings(c).is_empty());
        assert!(tree.following_siblings(root).is_empty());
        assert_eq!(tree.previous_sibling(c), Some(b));
        assert_eq!(tree.previous_sibling(a), None);
    }

    #[test]
    fn test_move_children_keeps_order() {
        let mut tree = Tree::new();
        let footer = tree.create(NodeData::SourceFooter(Attributes::new()));
        let caption = tree.create_element("figcaption");
        let one = tree.create_text("one");
        let two = tree.create_element("cite");
        tree.append(footer, one);
        tree.append(footer, two);

        tree.move_children(footer, caption);
        assert!(tree.children(footer).is_empty());
        assert_eq!(tree.children(caption), &[one, two]);
        assert_eq!(tree.parent(two), Some(caption));
    }

    #[test]
    fn test_find_in_document_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let outer = tree.create(NodeData::Marker(Attributes::new()));
        let p = tree.create_element("p");
        let inner = tree.create(NodeData::Marker(Attributes::new()));
        tree.append(root, outer);
        tree.append(root, p);
        tree.append(p, inner);

        let markers = tree.find(|data| matches!(data, NodeData::Marker(_)));
        assert_eq!(markers, vec![outer, inner]);
    }

    #[test]
    fn test_copy_attributes() {
        let mut tree = Tree::new();
        let marker = tree.create(NodeData::Marker(
            [("class", "wide"), ("lang", "he")].into_iter().collect(),
        ));
        let img = tree.create_element("img");
        assert_eq!(tree.copy_attributes(marker, img), 2);
        assert_eq!(tree.attrs(img).and_then(|a| a.get("lang")), Some("he"));

        let text = tree.create_text("x");
        assert_eq!(tree.copy_attributes(marker, text), 0);
    }

    #[test]
    fn test_tag_of_transient_nodes() {
        let mut tree = Tree::new();
        let marker = tree.create(NodeData::Marker(Attributes::new()));
        let footer = tree.create(NodeData::SourceFooter(Attributes::new()));
        assert_eq!(tree.tag(marker), Some(MARKER_TAG));
        assert_eq!(tree.tag(footer), Some(SOURCE_FOOTER_TAG));
        assert!(!tree.is_element_named(footer, "footer"));
    }
}
