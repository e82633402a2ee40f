use css_selectors::{ElementAdapter, Selector, matches};
use css_syntax::{Declaration, StyleRule, Stylesheet};
use html::{DOM, NodeId, NodeRef};

use crate::RenderError;

/// Selector access to the parsed DOM.
struct DomAdapter<'dom> {
    dom: &'dom DOM,
}

impl ElementAdapter for DomAdapter<'_> {
    type Handle = NodeId;

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        self.dom.get(element)?.tag()
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.dom.get(element)?.attr(name)
    }
}

fn try_clone_str(text: &str) -> Result<String, RenderError> {
    let mut out = String::new();
    out.try_reserve_exact(text.len())?;
    out.push_str(text);
    Ok(out)
}

fn try_clone_declaration(declaration: &Declaration) -> Result<Declaration, RenderError> {
    Ok(Declaration {
        name: try_clone_str(&declaration.name)?,
        value: try_clone_str(&declaration.value)?,
    })
}

/// A stylesheet with every rule's selector classified up front, so a whole tree
/// can be styled without re-reading selector text per node.
pub struct Cascade<'sheet> {
    rules: Vec<(Selector<'sheet>, &'sheet StyleRule)>,
}

impl<'sheet> Cascade<'sheet> {
    pub fn new(stylesheet: &'sheet Stylesheet) -> Result<Self, RenderError> {
        let mut rules = Vec::new();
        rules.try_reserve_exact(stylesheet.rules.len())?;
        rules.extend(
            stylesheet
                .rules
                .iter()
                .map(|rule| (Selector::parse(&rule.prelude), rule)),
        );
        Ok(Self { rules })
    }

    /// Declarations of every rule matching `node`, concatenated in source order.
    /// Non-element nodes get an empty list.
    pub fn compute(&self, node: NodeRef<'_>) -> Result<Vec<Declaration>, RenderError> {
        let mut style = Vec::new();
        if !node.is_element() {
            return Ok(style);
        }
        let adapter = DomAdapter { dom: node.dom() };
        for (selector, rule) in &self.rules {
            if !matches(&adapter, node.id(), selector) {
                continue;
            }
            style.try_reserve(rule.declarations.len())?;
            for declaration in &rule.declarations {
                style.push(try_clone_declaration(declaration)?);
            }
        }
        Ok(style)
    }
}

/// Compute the style of a single node. Building a [`Cascade`] once is cheaper
/// when styling many nodes against the same sheet.
pub fn compute_style(
    node: NodeRef<'_>,
    stylesheet: &Stylesheet,
) -> Result<Vec<Declaration>, RenderError> {
    Cascade::new(stylesheet)?.compute(node)
}
