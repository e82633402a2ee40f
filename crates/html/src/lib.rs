#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Markup tree and a best-effort, hand-rolled HTML parser.

pub mod dom;
pub mod parser;

pub use dom::{DOM, DOMNode, NodeKind, NodeRef};
pub use indextree::NodeId;
pub use parser::{HTMLParser, ParserConfig, parse_html};
