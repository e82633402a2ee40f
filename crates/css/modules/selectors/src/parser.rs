use core::fmt;

use crate::Selector;

impl<'text> Selector<'text> {
    /// Classify selector text by its first character. The text is trimmed first;
    /// nothing else is validated.
    pub fn parse(text: &'text str) -> Self {
        let text = text.trim();
        if let Some(id) = text.strip_prefix('#') {
            Self::Id(id)
        } else if let Some(class) = text.strip_prefix('.') {
            Self::Class(class)
        } else {
            Self::Type(text)
        }
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(formatter, "#{id}"),
            Self::Class(class) => write!(formatter, ".{class}"),
            Self::Type(tag) => formatter.write_str(tag),
        }
    }
}
