#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Flat cascade and render-tree construction over a parsed DOM and stylesheet.
//!
//! A render tree mirrors the DOM one-to-one. Each node borrows its DOM node and
//! owns a copy of every declaration from every rule that matched it, in
//! stylesheet order. Later rules do not override earlier ones; both are kept.

use std::collections::TryReserveError;
use thiserror::Error;

mod cascade;
mod render_tree;

pub use cascade::{Cascade, compute_style};
pub use render_tree::{RenderNode, build_render_tree};

/// Fatal errors from render-tree construction. Malformed input is never one of
/// these; it is reported by the parsers as diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("allocation failed while building the render tree: {0}")]
    AllocationFailure(#[from] TryReserveError),
}
