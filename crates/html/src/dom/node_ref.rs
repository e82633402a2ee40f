use core::fmt;
use core::ptr;

use super::{DOM, DOMNode, NodeKind};
use indextree::{Node, NodeId};

/// Borrowed, read-only handle to one node of a [`DOM`].
///
/// Holding a `NodeRef` keeps the whole tree borrowed, so the node it points at
/// cannot be removed while the handle is alive.
#[derive(Clone, Copy)]
pub struct NodeRef<'dom> {
    dom: &'dom DOM,
    id: NodeId,
    node: &'dom Node<DOMNode>,
}

impl<'dom> NodeRef<'dom> {
    pub(super) fn new(dom: &'dom DOM, id: NodeId, node: &'dom Node<DOMNode>) -> Self {
        Self { dom, id, node }
    }

    fn at(&self, id: Option<NodeId>) -> Option<Self> {
        id.and_then(|target| self.dom.node(target))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn dom(&self) -> &'dom DOM {
        self.dom
    }

    pub fn data(&self) -> &'dom DOMNode {
        self.node.get()
    }

    pub fn kind(&self) -> &'dom NodeKind {
        &self.node.get().kind
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind(), NodeKind::Element { .. })
    }

    /// Tag name for elements, `None` for every other kind.
    pub fn tag_name(&self) -> Option<&'dom str> {
        self.node.get().tag()
    }

    /// Content of text and comment nodes.
    pub fn text(&self) -> Option<&'dom str> {
        match self.kind() {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            NodeKind::Document | NodeKind::Element { .. } => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&'dom str> {
        self.node.get().attr(name)
    }

    /// Attributes in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = (&'dom str, &'dom str)> + use<'dom> {
        self.node
            .get()
            .attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn parent(&self) -> Option<Self> {
        self.at(self.node.parent())
    }

    pub fn first_child(&self) -> Option<Self> {
        self.at(self.node.first_child())
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.at(self.node.next_sibling())
    }

    pub fn previous_sibling(&self) -> Option<Self> {
        self.at(self.node.previous_sibling())
    }

    /// Children in document order.
    pub fn children(&self) -> impl Iterator<Item = Self> + use<'dom> {
        let dom = self.dom;
        self.id
            .children(dom.arena())
            .filter_map(move |child| dom.node(child))
    }

    pub fn child_count(&self) -> usize {
        self.id.children(self.dom.arena()).count()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.dom, other.dom) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}
