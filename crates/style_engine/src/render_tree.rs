use core::{fmt, mem};

use css_syntax::{Declaration, Stylesheet};
use html::{DOM, NodeKind, NodeRef};
use log::debug;
use serde_json::{Map, Value, json};

use crate::{Cascade, RenderError};

/// A DOM node paired with its cascaded style.
///
/// Borrows the DOM it was built from; dropping a render tree never touches the
/// DOM. Children are one-to-one with the DOM node's children, in order.
pub struct RenderNode<'dom> {
    node: NodeRef<'dom>,
    style: Vec<Declaration>,
    children: Vec<RenderNode<'dom>>,
}

impl<'dom> RenderNode<'dom> {
    pub fn node(&self) -> NodeRef<'dom> {
        self.node
    }

    /// Matched declarations in stylesheet order, duplicates included.
    pub fn style(&self) -> &[Declaration] {
        &self.style
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Number of nodes in this subtree, itself included.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Deterministic JSON snapshot, built without recursion.
    /// Schema: { "node": {..}, "style": [ { "name", "value" } ], "children": [ ... ] }
    ///
    /// Dropping a deeply nested `Value` recurses inside `serde_json`; prefer
    /// [`RenderNode::to_json_string`] for trees of unbounded depth.
    pub fn to_json_value(&self) -> Value {
        let mut root = JsonFrame::new(self);
        let mut open: Vec<JsonFrame<'_, 'dom>> = Vec::new();
        loop {
            let top = open.last_mut().unwrap_or(&mut root);
            let render = top.render;
            if let Some(child) = render.children.get(top.children.len()) {
                open.push(JsonFrame::new(child));
                continue;
            }
            let Some(done) = open.pop() else {
                break;
            };
            let value = done.finish();
            open.last_mut().unwrap_or(&mut root).children.push(value);
        }
        root.finish()
    }

    /// Compact JSON text, equal to serializing [`RenderNode::to_json_value`].
    pub fn to_json_string(&self) -> String {
        let mut out = String::new();
        match write_json(self, &mut out) {
            Ok(()) => out,
            Err(_) => String::from("{}"),
        }
    }
}

fn node_summary(node: NodeRef<'_>) -> Value {
    match node.kind() {
        NodeKind::Document => json!({ "type": "document" }),
        NodeKind::Element { tag } => json!({ "type": "element", "tag": tag }),
        NodeKind::Text { text } => json!({ "type": "text", "text": text }),
        NodeKind::Comment { text } => json!({ "type": "comment", "text": text }),
    }
}

fn style_json(style: &[Declaration]) -> Value {
    style
        .iter()
        .map(|declaration| json!({ "name": declaration.name, "value": declaration.value }))
        .collect()
}

/// A render node whose children are being converted. The next child to visit
/// is the one at `children.len()`.
struct JsonFrame<'tree, 'dom> {
    render: &'tree RenderNode<'dom>,
    children: Vec<Value>,
}

impl<'tree, 'dom> JsonFrame<'tree, 'dom> {
    fn new(render: &'tree RenderNode<'dom>) -> Self {
        Self {
            render,
            children: Vec::new(),
        }
    }

    fn finish(self) -> Value {
        let mut object = Map::new();
        object.insert(String::from("node"), node_summary(self.render.node));
        object.insert(String::from("style"), style_json(&self.render.style));
        object.insert(String::from("children"), Value::Array(self.children));
        Value::Object(object)
    }
}

enum JsonStep<'tree, 'dom> {
    Enter(&'tree RenderNode<'dom>),
    Leave(&'tree RenderNode<'dom>),
    Separator,
}

/// Keys are written in the sorted order `serde_json` uses for its maps.
fn write_json(root: &RenderNode<'_>, out: &mut impl fmt::Write) -> fmt::Result {
    let mut pending = vec![JsonStep::Enter(root)];
    while let Some(step) = pending.pop() {
        match step {
            JsonStep::Separator => out.write_char(',')?,
            JsonStep::Enter(render) => {
                out.write_str("{\"children\":[")?;
                pending.push(JsonStep::Leave(render));
                for (index, child) in render.children.iter().rev().enumerate() {
                    if index > 0 {
                        pending.push(JsonStep::Separator);
                    }
                    pending.push(JsonStep::Enter(child));
                }
            }
            JsonStep::Leave(render) => write!(
                out,
                "],\"node\":{},\"style\":{}}}",
                node_summary(render.node),
                style_json(&render.style)
            )?,
        }
    }
    Ok(())
}

/// Same DOM nodes, same styles, same shape.
impl PartialEq for RenderNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.node != right.node
                || left.style != right.style
                || left.children.len() != right.children.len()
            {
                return false;
            }
            pending.extend(left.children.iter().zip(right.children.iter()));
        }
        true
    }
}

impl Eq for RenderNode<'_> {}

// Deep trees would overflow the stack through the default recursive drop.
impl Drop for RenderNode<'_> {
    fn drop(&mut self) {
        let mut pending = mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

fn write_label(formatter: &mut fmt::Formatter<'_>, node: NodeRef<'_>) -> fmt::Result {
    match node.kind() {
        NodeKind::Document => formatter.write_str("#document"),
        NodeKind::Element { tag } => {
            write!(formatter, "<{tag}")?;
            for (name, value) in node.attrs() {
                write!(formatter, " {name}={value:?}")?;
            }
            formatter.write_str(">")
        }
        NodeKind::Text { text } => write!(formatter, "{text:?}"),
        NodeKind::Comment { text } => write!(formatter, "<!--{text}-->"),
    }
}

/// Indented dump, one node per line, with its style in `[ style: ... ]`.
impl fmt::Debug for RenderNode<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self, 0_usize)];
        while let Some((render, depth)) = pending.pop() {
            for _ in 0..depth {
                formatter.write_str("  ")?;
            }
            write_label(formatter, render.node)?;
            if !render.style.is_empty() {
                formatter.write_str(" [ style:")?;
                for declaration in &render.style {
                    write!(formatter, " {declaration}")?;
                }
                formatter.write_str(" ]")?;
            }
            writeln!(formatter)?;
            pending.extend(render.children.iter().rev().map(|child| (child, depth + 1)));
        }
        Ok(())
    }
}

/// A render node under construction and the next DOM child still to visit.
struct Frame<'dom> {
    render: RenderNode<'dom>,
    next_child: Option<NodeRef<'dom>>,
}

impl<'dom> Frame<'dom> {
    fn open(node: NodeRef<'dom>, cascade: &Cascade<'_>) -> Result<Self, RenderError> {
        let style = cascade.compute(node)?;
        let mut children = Vec::new();
        children.try_reserve_exact(node.child_count())?;
        Ok(Self {
            render: RenderNode {
                node,
                style,
                children,
            },
            next_child: node.first_child(),
        })
    }
}

/// Build the render tree for `dom`, pre-order, styling every node against
/// `stylesheet`. Runs on an explicit stack, so document depth is bounded only
/// by memory.
pub fn build_render_tree<'dom>(
    dom: &'dom DOM,
    stylesheet: &Stylesheet,
) -> Result<RenderNode<'dom>, RenderError> {
    let cascade = Cascade::new(stylesheet)?;
    let mut root = Frame::open(dom.document(), &cascade)?;
    let mut open: Vec<Frame<'dom>> = Vec::new();
    let mut built = 1_usize;

    loop {
        let top = open.last_mut().unwrap_or(&mut root);
        if let Some(child) = top.next_child {
            top.next_child = child.next_sibling();
            let frame = Frame::open(child, &cascade)?;
            open.try_reserve(1)?;
            open.push(frame);
            built += 1;
            continue;
        }
        let Some(done) = open.pop() else {
            break;
        };
        // Capacity for every child was reserved when the parent was opened.
        open.last_mut()
            .unwrap_or(&mut root)
            .render
            .children
            .push(done.render);
    }

    debug!(
        "built render tree: {built} nodes from {} rules",
        stylesheet.rules.len()
    );
    Ok(root.render)
}
