use crate::{ElementAdapter, Selector};

/// True if whitespace-separated `class_attr` contains exactly `class`.
pub fn has_class_token(class_attr: &str, class: &str) -> bool {
    class_attr
        .split_ascii_whitespace()
        .any(|token| token == class)
}

/// Match a selector against a single node. Non-elements never match.
pub fn matches<A: ElementAdapter>(adapter: &A, element: A::Handle, selector: &Selector<'_>) -> bool {
    if adapter.tag_name(element).is_none() {
        return false;
    }
    match selector {
        Selector::Id(id) => adapter.attr(element, "id") == Some(*id),
        Selector::Class(class) => adapter
            .attr(element, "class")
            .is_some_and(|value| has_class_token(value, class)),
        Selector::Type(tag) => adapter.tag_name(element) == Some(*tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Element {
        tag: Option<&'static str>,
        attrs: Vec<(&'static str, &'static str)>,
    }

    struct Elements(Vec<Element>);

    impl ElementAdapter for Elements {
        type Handle = usize;

        fn tag_name(&self, element: usize) -> Option<&str> {
            self.0.get(element)?.tag
        }

        fn attr(&self, element: usize, name: &str) -> Option<&str> {
            self.0
                .get(element)?
                .attrs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        }
    }

    fn fixture() -> Elements {
        Elements(vec![
            Element {
                tag: Some("div"),
                attrs: vec![("id", "main"), ("class", "container test")],
            },
            Element {
                tag: Some("b"),
                attrs: vec![("class", "testing")],
            },
            Element {
                tag: None,
                attrs: Vec::new(),
            },
            Element {
                tag: Some("DIV"),
                attrs: vec![("class", "\ttest\n")],
            },
        ])
    }

    #[test]
    fn class_matches_whole_tokens_only() {
        let elements = fixture();
        let selector = Selector::parse(".test");
        assert!(matches(&elements, 0, &selector));
        assert!(!matches(&elements, 1, &selector));
        assert!(matches(&elements, 3, &selector));
        assert!(!matches(&elements, 0, &Selector::parse(".container test")));
    }

    #[test]
    fn id_matches_exactly() {
        let elements = fixture();
        assert!(matches(&elements, 0, &Selector::parse("#main")));
        assert!(!matches(&elements, 0, &Selector::parse("#mai")));
        assert!(!matches(&elements, 1, &Selector::parse("#main")));
    }

    #[test]
    fn tag_is_case_sensitive() {
        let elements = fixture();
        assert!(matches(&elements, 0, &Selector::parse("div")));
        assert!(!matches(&elements, 3, &Selector::parse("div")));
        assert!(matches(&elements, 3, &Selector::parse("DIV")));
    }

    #[test]
    fn non_elements_never_match() {
        let elements = fixture();
        for text in ["#main", ".test", "div", ""] {
            assert!(!matches(&elements, 2, &Selector::parse(text)));
        }
    }

    #[test]
    fn class_tokens_split_on_any_whitespace() {
        assert!(has_class_token("a  b\tc", "c"));
        assert!(!has_class_token("", "a"));
        assert!(!has_class_token("abc", "b"));
    }
}
