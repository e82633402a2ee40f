//! Flat stylesheet parsing.
//!
//! Accepts `selector { prop: value; ... } selector { ... }` with no nesting, no
//! at-rules and no comments. Values are kept as raw trimmed text. Parsing never
//! fails; anything that had to be skipped or guessed is recorded in the caller's
//! [`Diagnostics`].
use core::fmt;
use diagnostics::{DiagnosticKind, Diagnostics};
use log::debug;

/// A single CSS declaration (property: value).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, trimmed, case preserved.
    pub name: String,
    /// Raw value text, trimmed.
    pub value: String,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single style rule with a raw prelude and parsed declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Raw prelude text (the selector), trimmed.
    pub prelude: String,
    /// Declarations within the rule block, in source order.
    pub declarations: Vec<Declaration>,
}

/// A parsed stylesheet consisting of style rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level style rules in source order.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {};", self.name, self.value)
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {{", self.prelude)?;
        for declaration in &self.declarations {
            write!(formatter, " {declaration}")?;
        }
        formatter.write_str(" }")
    }
}

/// One rule per line.
impl fmt::Display for Stylesheet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(formatter, "{rule}")?;
        }
        Ok(())
    }
}

fn malformed(diagnostics: &mut Diagnostics, offset: usize, message: String) {
    diagnostics.record(DiagnosticKind::MalformedStylesheet, offset, message);
}

/// Parse the inside of one `{ ... }` block. `base` is the block's byte offset in
/// the whole stylesheet, used for diagnostics only.
fn parse_declarations(block: &str, base: usize, diagnostics: &mut Diagnostics) -> Vec<Declaration> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(rest) = block.get(cursor..) {
        let item = rest.trim_start();
        if item.is_empty() {
            break;
        }
        let lead = rest.len() - item.len();
        let item_offset = base + cursor + lead;

        let Some((raw_name, after_colon)) = item.split_once(':') else {
            malformed(
                diagnostics,
                item_offset,
                format!("declaration `{}` has no ':'; dropped", item.trim_end()),
            );
            break;
        };
        let (raw_value, consumed) = match after_colon.split_once(';') {
            Some((value, _)) => (value, value.len() + 1),
            None => (after_colon, after_colon.len()),
        };

        let name = raw_name.trim();
        if name.is_empty() {
            malformed(
                diagnostics,
                item_offset,
                String::from("declaration has an empty property name; dropped"),
            );
        } else {
            out.push(Declaration::new(name, raw_value.trim()));
        }
        cursor += lead + raw_name.len() + 1 + consumed;
    }
    out
}

/// Parse a full stylesheet into a `Stylesheet`, appending recoverable problems to
/// `diagnostics`. Rules keep source order.
pub fn parse_stylesheet(css: &str, diagnostics: &mut Diagnostics) -> Stylesheet {
    let mut sheet = Stylesheet::default();
    if css.trim().is_empty() {
        diagnostics.record(DiagnosticKind::EmptyInput, 0, "empty stylesheet input");
        return sheet;
    }

    let mut pos = 0;
    while let Some(rest) = css.get(pos..) {
        let item = rest.trim_start();
        if item.is_empty() {
            break;
        }
        let rule_offset = pos + (rest.len() - item.len());

        let Some((raw_prelude, after_brace)) = item.split_once('{') else {
            malformed(
                diagnostics,
                rule_offset,
                format!("selector `{}` has no declaration block", item.trim_end()),
            );
            break;
        };
        let prelude = raw_prelude.trim().to_owned();
        let body_offset = rule_offset + raw_prelude.len() + 1;

        let (body, next) = if let Some((body, _)) = after_brace.split_once('}') {
            (body, body_offset + body.len() + 1)
        } else {
            malformed(
                diagnostics,
                rule_offset,
                format!("block for `{prelude}` is not closed"),
            );
            (after_brace, css.len())
        };

        let declarations = parse_declarations(body, body_offset, diagnostics);
        sheet.rules.push(StyleRule {
            prelude,
            declarations,
        });
        pos = next;
    }

    debug!(
        "parsed stylesheet: {} rules, {} declarations",
        sheet.rules.len(),
        sheet
            .rules
            .iter()
            .map(|rule| rule.declarations.len())
            .sum::<usize>()
    );
    sheet
}
