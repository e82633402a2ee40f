mod node_ref;
mod printing;

pub use node_ref::NodeRef;

use indextree::{Arena, Node, NodeError, NodeId};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    /// Representable for hosts that build trees by hand; the parser discards comments.
    Comment {
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMNode {
    pub kind: NodeKind,
    /// Attributes in insertion order. Only elements carry any.
    pub attrs: SmallVec<(String, String), 4>,
}

impl DOMNode {
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Document | NodeKind::Text { .. } | NodeKind::Comment { .. } => None,
        }
    }

    /// First attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A markup tree. Nodes live in an arena and are exclusively owned by it; parent
/// links are plain ids, so dropping the `DOM` drops every node exactly once.
pub struct DOM {
    dom: Arena<DOMNode>,
    root: NodeId,
}

impl DOM {
    /// Create a tree holding only the synthetic document root.
    pub fn new() -> Self {
        let mut dom = Arena::new();
        Self {
            root: dom.new_node(DOMNode::default()),
            dom,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read-only view of the document root.
    pub fn document(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root, &self.dom[self.root])
    }

    /// Read-only view of a node, or `None` if the id was removed or never existed here.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let node = self.dom.get(id)?;
        if node.is_removed() {
            return None;
        }
        Some(NodeRef::new(self, id, node))
    }

    pub fn get(&self, id: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(id)
            .filter(|node| !node.is_removed())
            .map(Node::get)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DOMNode> {
        self.dom
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(Node::get_mut)
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.dom.new_node(DOMNode {
            kind: NodeKind::Element { tag: tag.into() },
            attrs: SmallVec::new(),
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.dom.new_node(DOMNode {
            kind: NodeKind::Text { text: text.into() },
            attrs: SmallVec::new(),
        })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.dom.new_node(DOMNode {
            kind: NodeKind::Comment { text: text.into() },
            attrs: SmallVec::new(),
        })
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Returns an error if the append would create a cycle or either node was removed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        parent.checked_append(child, &mut self.dom)
    }

    /// Add an attribute to an element. Names already present keep their first value;
    /// returns `false` in that case or when `node` is not an element.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let Some(data) = self.get_mut(node) else {
            return false;
        };
        if data.tag().is_none() {
            return false;
        }
        let name = name.into();
        if data.attr(&name).is_some() {
            return false;
        }
        data.attrs.push((name, value.into()));
        true
    }

    /// Detach and free `node` together with its whole subtree.
    /// The document root cannot be removed.
    pub fn remove_subtree(&mut self, node: NodeId) -> bool {
        if node == self.root || self.get(node).is_none() {
            return false;
        }
        node.remove_subtree(&mut self.dom);
        true
    }

    /// Number of live nodes reachable from the root, root included.
    pub fn len(&self) -> usize {
        self.root.descendants(&self.dom).count()
    }

    /// True when the document root has no children.
    pub fn is_empty(&self) -> bool {
        self.dom[self.root].first_child().is_none()
    }

    /// Concatenated text of every `<style>` element, in document order.
    pub fn inline_style_text(&self) -> String {
        let mut css = String::new();
        for id in self.root.descendants(&self.dom) {
            let is_style = self
                .get(id)
                .and_then(DOMNode::tag)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("style"));
            if !is_style {
                continue;
            }
            for child in id.children(&self.dom) {
                if let Some(NodeKind::Text { text }) = self.get(child).map(|data| &data.kind) {
                    if !css.is_empty() {
                        css.push('\n');
                    }
                    css.push_str(text);
                }
            }
        }
        css
    }

    pub(crate) fn arena(&self) -> &Arena<DOMNode> {
        &self.dom
    }
}

impl Default for DOM {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality: same shape, kinds and attributes, regardless of arena layout.
impl PartialEq for DOM {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.root.descendants(&self.dom);
        let mut right = other.root.descendants(&other.dom);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(left_id), Some(right_id)) => {
                    if self.get(left_id) != other.get(right_id) {
                        return false;
                    }
                    let left_children = left_id.children(&self.dom).count();
                    let right_children = right_id.children(&other.dom).count();
                    if left_children != right_children {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Eq for DOM {}
