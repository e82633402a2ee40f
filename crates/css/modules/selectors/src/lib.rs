//! Simple selector matching.
//!
//! Three forms are recognised, keyed on the first character of the selector
//! text: `#id`, `.class` and a bare tag name. There are no combinators,
//! attribute operators or pseudo-classes.

mod matcher;
mod parser;

pub use matcher::{has_class_token, matches};

/// An adapter that abstracts DOM access for selector matching.
/// Implement this for your DOM layer.
pub trait ElementAdapter {
    type Handle: Copy;

    /// Tag name exactly as parsed, or `None` for anything that is not an element.
    fn tag_name(&self, element: Self::Handle) -> Option<&str>;

    /// Returns the attribute value if present.
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;
}

/// A parsed simple selector. See [`Selector::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selector<'text> {
    /// `#name`: the `id` attribute equals `name`.
    Id(&'text str),
    /// `.name`: the `class` attribute holds `name` as a whitespace-separated token.
    Class(&'text str),
    /// Anything else: the tag name equals the text, case-sensitive.
    Type(&'text str),
}
