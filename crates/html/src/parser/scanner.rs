//! Forward-only byte cursor over the markup source.
//!
//! Every stop condition is an ASCII byte, so positions the parser slices at are
//! always UTF-8 character boundaries.

/// Tag-name characters: ASCII letters, digits, '-' and '_'.
pub fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

pub struct Scanner<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + ahead).copied()
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.source
            .as_bytes()
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(prefix))
    }

    /// Move forward by `count` bytes, or by one whole character when the current
    /// byte starts a multi-byte sequence.
    pub fn advance(&mut self, count: usize) {
        let mut target = (self.pos + count).min(self.source.len());
        while !self.source.is_char_boundary(target) {
            target += 1;
        }
        self.pos = target;
    }

    /// Jump to an absolute position previously obtained from this scanner.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.source.len());
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Absolute position of the next `needle` at or after the cursor.
    pub fn find(&self, needle: u8) -> Option<usize> {
        self.source
            .as_bytes()
            .get(self.pos..)?
            .iter()
            .position(|&byte| byte == needle)
            .map(|offset| self.pos + offset)
    }

    /// Consume bytes while `accept` holds and return them.
    pub fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'src str {
        let start = self.pos;
        // `advance` consumes an accepted multi-byte character whole.
        while let Some(byte) = self.peek() {
            if !accept(byte) {
                break;
            }
            self.advance(1);
        }
        self.slice(start, self.pos)
    }

    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        self.source.get(start..end).unwrap_or_default()
    }
}
