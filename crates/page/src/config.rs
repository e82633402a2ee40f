//! Configuration for loading a page.
//!
//! Can be loaded from environment variables or constructed programmatically.

use html::ParserConfig;
use html::parser::DEFAULT_MAX_NESTING_DEPTH;
use std::env;

/// Settings that shape how markup and styles are loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageConfig {
    /// Deepest element nesting the markup parser builds (minimum 1)
    pub max_nesting_depth: usize,
    /// Whether text inside `<style>` elements is prepended to the supplied stylesheet
    pub inline_styles: bool,
}

impl PageConfig {
    /// Construct a new `PageConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `max_nesting_depth` - Element nesting bound (values below 1 become 1)
    /// * `inline_styles` - Whether `<style>` element text joins the stylesheet
    #[inline]
    #[must_use]
    pub const fn new(max_nesting_depth: usize, inline_styles: bool) -> Self {
        let depth = if max_nesting_depth < 1 {
            1
        } else {
            max_nesting_depth
        };
        Self {
            max_nesting_depth: depth,
            inline_styles,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `BEM_MAX_NESTING_DEPTH`: element nesting bound (default: 1024)
    /// - `BEM_INLINE_STYLES`: set to "0" to ignore `<style>` elements (default: enabled)
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PageConfig::from_env`], reading values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_nesting_depth = lookup("BEM_MAX_NESTING_DEPTH")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_NESTING_DEPTH)
            .max(1);
        let inline_styles = lookup("BEM_INLINE_STYLES").as_deref() != Some("0");
        Self {
            max_nesting_depth,
            inline_styles,
        }
    }

    /// The parser-level settings derived from this configuration.
    #[inline]
    #[must_use]
    pub const fn parser_config(&self) -> ParserConfig {
        ParserConfig::new(self.max_nesting_depth)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'pairs>(
        pairs: &'pairs [(&'pairs str, &'pairs str)],
    ) -> impl Fn(&str) -> Option<String> + 'pairs {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = PageConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.max_nesting_depth, 1024);
        assert!(config.inline_styles);
    }

    #[test]
    fn values_are_read_and_clamped() {
        let config = PageConfig::from_lookup(lookup_from(&[
            ("BEM_MAX_NESTING_DEPTH", "0"),
            ("BEM_INLINE_STYLES", "0"),
        ]));
        assert_eq!(config, PageConfig::new(1, false));

        let trimmed = PageConfig::from_lookup(lookup_from(&[("BEM_MAX_NESTING_DEPTH", " 64 ")]));
        assert_eq!(trimmed.max_nesting_depth, 64);
    }

    #[test]
    fn unparsable_depth_falls_back_to_default() {
        let config = PageConfig::from_lookup(lookup_from(&[("BEM_MAX_NESTING_DEPTH", "deep")]));
        assert_eq!(config.max_nesting_depth, 1024);
    }
}
