use core::fmt;

use super::{DOM, NodeKind, NodeRef};

use serde_json::{Map, Value, json};

// -----------------------
// Module-scope helpers
// -----------------------
// Every walk below runs on an explicit stack: trees may be nested as deep as
// the parser allows, which is far deeper than the native stack.

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_indent(out: &mut impl fmt::Write, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str("  ")?;
    }
    Ok(())
}

fn attrs_json(node: NodeRef<'_>) -> Value {
    let mut attrs_obj = Map::new();
    for (name, value) in node.attrs() {
        attrs_obj.insert(name.to_owned(), Value::String(value.to_owned()));
    }
    Value::Object(attrs_obj)
}

/// JSON for one node whose children are already converted. The children are
/// moved in, not re-serialized.
fn node_json(node: NodeRef<'_>, children: Vec<Value>) -> Value {
    let mut value = match node.kind() {
        NodeKind::Document => json!({ "type": "document" }),
        NodeKind::Element { tag } => json!({
            "type": "element",
            "tag": tag,
            "attrs": attrs_json(node),
        }),
        NodeKind::Text { text } => return json!({ "type": "text", "text": text }),
        NodeKind::Comment { text } => return json!({ "type": "comment", "text": text }),
    };
    if let Value::Object(object) = &mut value {
        object.insert(String::from("children"), Value::Array(children));
    }
    value
}

/// A node whose children are being converted, and the next child to visit.
struct JsonFrame<'dom> {
    node: NodeRef<'dom>,
    next_child: Option<NodeRef<'dom>>,
    children: Vec<Value>,
}

impl<'dom> JsonFrame<'dom> {
    fn new(node: NodeRef<'dom>) -> Self {
        Self {
            node,
            next_child: node.first_child(),
            children: Vec::new(),
        }
    }

    fn finish(self) -> Value {
        node_json(self.node, self.children)
    }
}

fn tree_to_json(root: NodeRef<'_>) -> Value {
    let mut root_frame = JsonFrame::new(root);
    let mut open = Vec::new();
    loop {
        let top = open.last_mut().unwrap_or(&mut root_frame);
        if let Some(child) = top.next_child {
            top.next_child = child.next_sibling();
            open.push(JsonFrame::new(child));
            continue;
        }
        let Some(done) = open.pop() else {
            break;
        };
        let value = done.finish();
        open.last_mut()
            .unwrap_or(&mut root_frame)
            .children
            .push(value);
    }
    root_frame.finish()
}

enum Step<'dom> {
    Enter(NodeRef<'dom>, usize),
    Leave(NodeRef<'dom>, usize),
    Separator,
}

/// Queue `node`'s children so they pop in document order, then `node`'s end.
fn push_children<'dom>(
    pending: &mut Vec<Step<'dom>>,
    node: NodeRef<'dom>,
    depth: usize,
    separated: bool,
) {
    pending.push(Step::Leave(node, depth));
    let children: Vec<NodeRef<'dom>> = node.children().collect();
    for (index, child) in children.into_iter().rev().enumerate() {
        if separated && index > 0 {
            pending.push(Step::Separator);
        }
        pending.push(Step::Enter(child, depth + 1));
    }
}

/// Compact JSON text with the same keys and order as [`tree_to_json`]'s value.
fn write_json(root: NodeRef<'_>, out: &mut impl fmt::Write) -> fmt::Result {
    let mut pending = vec![Step::Enter(root, 0)];
    while let Some(step) = pending.pop() {
        match step {
            Step::Separator => out.write_char(',')?,
            Step::Enter(node, depth) => match node.kind() {
                NodeKind::Document => {
                    out.write_str("{\"children\":[")?;
                    push_children(&mut pending, node, depth, true);
                }
                NodeKind::Element { .. } => {
                    write!(out, "{{\"attrs\":{},\"children\":[", attrs_json(node))?;
                    push_children(&mut pending, node, depth, true);
                }
                NodeKind::Text { text } => {
                    let text = Value::from(text.as_str());
                    write!(out, "{{\"text\":{text},\"type\":\"text\"}}")?;
                }
                NodeKind::Comment { text } => {
                    let text = Value::from(text.as_str());
                    write!(out, "{{\"text\":{text},\"type\":\"comment\"}}")?;
                }
            },
            Step::Leave(node, _) => match node.kind() {
                NodeKind::Element { tag } => {
                    let tag = Value::from(tag.as_str());
                    write!(out, "],\"tag\":{tag},\"type\":\"element\"}}")?;
                }
                NodeKind::Document | NodeKind::Text { .. } | NodeKind::Comment { .. } => {
                    out.write_str("],\"type\":\"document\"}")?;
                }
            },
        }
    }
    Ok(())
}

fn fmt_tree(root: NodeRef<'_>, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut pending = vec![Step::Enter(root, 0)];
    while let Some(step) = pending.pop() {
        match step {
            Step::Separator => {}
            Step::Enter(node, depth) => {
                write_indent(formatter, depth)?;
                match node.kind() {
                    NodeKind::Document => writeln!(formatter, "#document")?,
                    NodeKind::Element { tag } => {
                        write!(formatter, "<{tag}")?;
                        for (name, value) in node.attrs() {
                            write!(formatter, " {name}=\"{}\"", escape_text(value))?;
                        }
                        writeln!(formatter, ">")?;
                    }
                    NodeKind::Text { text } => writeln!(formatter, "\"{}\"", escape_text(text))?,
                    NodeKind::Comment { text } => {
                        writeln!(formatter, "<!--{}-->", escape_text(text))?;
                    }
                }
                push_children(&mut pending, node, depth, false);
            }
            Step::Leave(node, depth) => {
                if let NodeKind::Element { tag } = node.kind() {
                    write_indent(formatter, depth)?;
                    writeln!(formatter, "</{tag}>")?;
                }
            }
        }
    }
    Ok(())
}

impl fmt::Debug for DOM {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "DOM")?;
        fmt_tree(self.document(), formatter)
    }
}

impl DOM {
    /// Build a deterministic JSON representation of the DOM.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ] }
    /// - Text: { "type":"text", "text":"..." }
    /// - Comment: { "type":"comment", "text":"..." }
    ///
    /// Dropping a deeply nested `Value` recurses inside `serde_json`; prefer
    /// [`DOM::to_json_string`] for trees of unbounded depth.
    pub fn to_json_value(&self) -> Value {
        tree_to_json(self.document())
    }

    /// Compact JSON text, equal to serializing [`DOM::to_json_value`], written
    /// without building the intermediate value.
    pub fn to_json_string(&self) -> String {
        let mut out = String::new();
        match write_json(self.document(), &mut out) {
            Ok(()) => out,
            Err(_) => String::from("{}"),
        }
    }
}
