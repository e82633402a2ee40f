#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Loads a page from markup and stylesheet text and builds its render tree.

use anyhow::{Context as _, Result};
use css_syntax::{Stylesheet, parse_stylesheet};
use diagnostics::Diagnostics;
use html::{DOM, HTMLParser};
use log::debug;
use style_engine::{RenderNode, build_render_tree};

mod config;

pub use config::PageConfig;

/// A parsed document and stylesheet, plus everything the parsers had to recover
/// from along the way.
pub struct Page {
    dom: DOM,
    stylesheet: Stylesheet,
    style_source: String,
    diagnostics: Diagnostics,
}

impl Page {
    /// Parse `html` and `css`. Never fails; problems end up in
    /// [`Page::diagnostics`].
    ///
    /// With inline styles enabled, the text of every `<style>` element is placed
    /// ahead of `css`, so supplied rules come later in the cascade.
    pub fn load(html: &str, css: &str, config: &PageConfig) -> Self {
        let mut diagnostics = Diagnostics::new();
        let dom = HTMLParser::new(html, config.parser_config()).parse(&mut diagnostics);

        let inline = if config.inline_styles {
            dom.inline_style_text()
        } else {
            String::new()
        };
        let style_source = if inline.trim().is_empty() {
            css.to_owned()
        } else {
            format!("{inline}\n{css}")
        };
        let stylesheet = parse_stylesheet(&style_source, &mut diagnostics);

        debug!(
            "loaded page: {} nodes, {} rules, {} diagnostics",
            dom.len(),
            stylesheet.rules.len(),
            diagnostics.len()
        );
        Self {
            dom,
            stylesheet,
            style_source,
            diagnostics,
        }
    }

    pub fn dom(&self) -> &DOM {
        &self.dom
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    /// The stylesheet text that was actually parsed. Stylesheet diagnostic
    /// offsets refer to this text.
    pub fn style_source(&self) -> &str {
        &self.style_source
    }

    /// Recoverable problems from both parsers, markup first.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Build the render tree. It borrows this page's DOM.
    pub fn render_tree(&self) -> Result<RenderNode<'_>> {
        build_render_tree(&self.dom, &self.stylesheet).context("failed to build render tree")
    }
}
