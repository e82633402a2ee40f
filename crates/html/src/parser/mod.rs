mod scanner;

use crate::dom::DOM;
use diagnostics::{DiagnosticKind, Diagnostics};
use indextree::NodeId;
use log::{debug, warn};
use scanner::{Scanner, is_name_byte};

/// Default bound on how many elements may be open at once.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 1024;

/// Parser-level settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Elements nested deeper than this are attached to the deepest allowed
    /// element instead of being opened.
    pub max_nesting_depth: usize,
}

impl ParserConfig {
    /// Construct a config; the nesting bound is clamped to at least 1.
    #[must_use]
    pub const fn new(max_nesting_depth: usize) -> Self {
        let depth = if max_nesting_depth < 1 {
            1
        } else {
            max_nesting_depth
        };
        Self {
            max_nesting_depth: depth,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

/// Parse `html` with the default config, appending recoverable problems to `diagnostics`.
///
/// Never fails: malformed input produces a best-effort tree.
pub fn parse_html(html: &str, diagnostics: &mut Diagnostics) -> DOM {
    HTMLParser::new(html, ParserConfig::default()).parse(diagnostics)
}

/// Best-effort markup parser.
///
/// Nesting is tracked with an explicit stack of open elements rather than native
/// recursion, so document depth never touches the call stack. The cursor only
/// moves forward, which keeps parsing linear in the input length.
pub struct HTMLParser<'src> {
    scanner: Scanner<'src>,
    dom: DOM,
    /// Open elements, innermost last. `open[0]` is always the document root.
    open: Vec<NodeId>,
    /// Elements opened past `max_nesting_depth` that are still waiting for a close tag.
    overflow: usize,
    config: ParserConfig,
    diagnostics: Diagnostics,
}

impl<'src> HTMLParser<'src> {
    pub fn new(html: &'src str, config: ParserConfig) -> Self {
        let dom = DOM::new();
        let open = vec![dom.root()];
        Self {
            scanner: Scanner::new(html),
            dom,
            open,
            overflow: 0,
            config,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run the parser to the end of input.
    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> DOM {
        if self.scanner.source().trim().is_empty() {
            self.diagnostics
                .record(DiagnosticKind::EmptyInput, 0, "empty HTML input");
        }

        loop {
            self.scanner.skip_whitespace();
            if self.scanner.at_end() {
                break;
            }
            if self.scanner.starts_with(b"</") {
                self.closing_tag();
            } else if self.scanner.starts_with(b"<!") {
                self.markup_declaration();
            } else if self.scanner.peek() == Some(b'<')
                && self.scanner.peek_at(1).is_some_and(is_name_byte)
            {
                self.start_tag();
            } else {
                self.text_run();
            }
        }

        self.close_remaining();
        debug!(
            "parsed HTML: {} nodes, {} diagnostics",
            self.dom.len(),
            self.diagnostics.len()
        );
        diagnostics.extend(self.diagnostics);
        self.dom
    }

    fn malformed(&mut self, offset: usize, message: String) {
        self.diagnostics
            .record(DiagnosticKind::MalformedMarkup, offset, message);
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.dom.root())
    }

    fn append(&mut self, child: NodeId) {
        let parent = self.current();
        if let Err(err) = self.dom.append_child(parent, child) {
            warn!("could not attach parsed node: {err}");
        }
    }

    /// `</name>`: closes exactly one level of nesting.
    fn closing_tag(&mut self) {
        let offset = self.scanner.position();
        self.scanner.advance(2);
        let name_start = self.scanner.position();
        let name = match self.scanner.find(b'>') {
            Some(end) => {
                let raw = self.scanner.slice(name_start, end);
                self.scanner.seek(end + 1);
                raw
            }
            None => {
                let raw = self.scanner.slice(name_start, self.scanner.len());
                self.scanner.seek(self.scanner.len());
                self.malformed(offset, String::from("closing tag is missing '>'"));
                raw
            }
        };
        let name = name.split_ascii_whitespace().next().unwrap_or_default();

        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        if self.open.len() <= 1 {
            self.malformed(offset, format!("stray closing tag </{name}> with nothing open"));
            return;
        }
        let Some(closed) = self.open.pop() else {
            return;
        };
        let open_tag = self
            .dom
            .get(closed)
            .and_then(|data| data.tag())
            .unwrap_or_default()
            .to_owned();
        if open_tag != name {
            self.malformed(
                offset,
                format!("closing tag </{name}> does not match open element <{open_tag}>"),
            );
        }
    }

    /// `<!DOCTYPE ...>` or `<!-- ... -->`: skipped up to the next '>'.
    fn markup_declaration(&mut self) {
        let offset = self.scanner.position();
        match self.scanner.find(b'>') {
            Some(end) => self.scanner.seek(end + 1),
            None => {
                self.scanner.seek(self.scanner.len());
                self.malformed(offset, String::from("markup declaration is missing '>'"));
            }
        }
    }

    fn start_tag(&mut self) {
        let offset = self.scanner.position();
        self.scanner.advance(1);
        let tag = self.scanner.take_while(is_name_byte).to_owned();
        let element = self.dom.create_element(tag.as_str());

        let mut self_closing = false;
        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                None => {
                    self.malformed(offset, format!("start tag <{tag}> is missing '>'"));
                    break;
                }
                Some(b'>') => {
                    self.scanner.advance(1);
                    break;
                }
                Some(b'/') => {
                    self.scanner.advance(1);
                    if self.scanner.peek() == Some(b'>') {
                        self.scanner.advance(1);
                        self_closing = true;
                        break;
                    }
                    let stray = self.scanner.position() - 1;
                    self.malformed(stray, format!("unexpected '/' inside <{tag}>"));
                }
                Some(_) => self.attribute(element, &tag),
            }
        }

        self.append(element);
        if self_closing {
            return;
        }
        let depth = self.open.len() - 1;
        if self.overflow > 0 || depth >= self.config.max_nesting_depth {
            self.overflow += 1;
            self.malformed(
                offset,
                format!(
                    "<{tag}> nests deeper than {} levels; its content is attached to the enclosing element",
                    self.config.max_nesting_depth
                ),
            );
        } else {
            self.open.push(element);
        }
    }

    /// One `name`, `name=value`, `name="value"` or `name='value'` item.
    fn attribute(&mut self, element: NodeId, tag: &str) {
        let offset = self.scanner.position();
        let name = self
            .scanner
            .take_while(|byte| {
                !byte.is_ascii_whitespace() && byte != b'=' && byte != b'>' && byte != b'/'
            })
            .to_owned();
        if name.is_empty() {
            // Only '=' can get here: every other stop byte is handled by the caller.
            self.scanner.advance(1);
            self.malformed(offset, format!("attribute without a name in <{tag}>"));
            return;
        }

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            // Valueless attributes are dropped.
            return;
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let value = match self.scanner.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.scanner.advance(1);
                let value_start = self.scanner.position();
                if let Some(end) = self.scanner.find(quote) {
                    let value = self.scanner.slice(value_start, end).to_owned();
                    self.scanner.seek(end + 1);
                    value
                } else {
                    let end = self.scanner.find(b'>').unwrap_or(self.scanner.len());
                    let value = self.scanner.slice(value_start, end).to_owned();
                    self.scanner.seek(end);
                    self.malformed(
                        offset,
                        format!("attribute {name} in <{tag}> is missing its closing quote"),
                    );
                    value
                }
            }
            None | Some(b'>') => {
                self.malformed(offset, format!("attribute {name} in <{tag}> has no value"));
                return;
            }
            Some(_) => {
                // Unquoted: runs up to whitespace, `>` or a self-closing `/>`.
                let value_start = self.scanner.position();
                while let Some(byte) = self.scanner.peek() {
                    if byte.is_ascii_whitespace()
                        || byte == b'>'
                        || self.scanner.starts_with(b"/>")
                    {
                        break;
                    }
                    self.scanner.advance(1);
                }
                self.scanner
                    .slice(value_start, self.scanner.position())
                    .to_owned()
            }
        };

        if !self.dom.set_attribute(element, name.as_str(), value) {
            self.malformed(
                offset,
                format!("duplicate attribute {name} in <{tag}>; first value kept"),
            );
        }
    }

    /// Character data up to the next '<'. Whitespace-only runs produce nothing.
    fn text_run(&mut self) {
        let start = self.scanner.position();
        // The current byte is either text or a '<' that does not open a tag.
        self.scanner.advance(1);
        let end = self.scanner.find(b'<').unwrap_or(self.scanner.len());
        self.scanner.seek(end);
        let text = self.scanner.slice(start, end).trim();
        if !text.is_empty() {
            let node = self.dom.create_text(text);
            self.append(node);
        }
    }

    /// Elements still open at end of input close implicitly.
    fn close_remaining(&mut self) {
        let end = self.scanner.len();
        if self.overflow > 0 {
            let count = self.overflow;
            self.overflow = 0;
            self.malformed(end, format!("{count} over-deep elements not closed before end of input"));
        }
        while self.open.len() > 1 {
            let Some(node) = self.open.pop() else {
                break;
            };
            let tag = self
                .dom
                .get(node)
                .and_then(|data| data.tag())
                .unwrap_or_default()
                .to_owned();
            self.malformed(end, format!("<{tag}> not closed before end of input"));
        }
    }
}
