#![cfg(test)]

use diagnostics::{DiagnosticKind, Diagnostics};
use html::{DOM, HTMLParser, NodeKind, NodeRef, ParserConfig, parse_html};

fn init_logging() {
    drop(env_logger::builder().is_test(true).try_init());
}

fn parse(html: &str) -> (DOM, Diagnostics) {
    init_logging();
    let mut diagnostics = Diagnostics::new();
    let dom = parse_html(html, &mut diagnostics);
    (dom, diagnostics)
}

fn element(tag: &str) -> NodeKind {
    NodeKind::Element { tag: tag.into() }
}

fn text(content: &str) -> NodeKind {
    NodeKind::Text {
        text: content.into(),
    }
}

fn child_kinds<'dom>(node: NodeRef<'dom>) -> Vec<&'dom NodeKind> {
    node.children().map(|child| child.kind()).collect()
}

#[test]
fn nested_round_trip() {
    let (dom, diagnostics) = parse("<a><b>x</b></a>");
    assert!(diagnostics.is_empty());

    let doc = dom.document();
    assert_eq!(doc.kind(), &NodeKind::Document);
    assert_eq!(child_kinds(doc), vec![&element("a")]);
    let anchor = doc.first_child().unwrap();
    assert_eq!(child_kinds(anchor), vec![&element("b")]);
    let bold = anchor.first_child().unwrap();
    assert_eq!(child_kinds(bold), vec![&text("x")]);
    assert_eq!(bold.parent(), Some(anchor));
}

#[test]
fn parsing_is_deterministic() {
    let source = "<body><div id=\"main\" class=\"container test\"><p>Hello <b class=\"test\">world</b>!</p><p>Hello world <b>again</b>!</p></div><br/></body>";
    let (first, first_diagnostics) = parse(source);
    let (second, second_diagnostics) = parse(source);
    assert!(first == second);
    assert_eq!(first.to_json_value(), second.to_json_value());
    assert_eq!(first_diagnostics, second_diagnostics);
}

#[test]
fn one_element_per_start_tag_and_one_text_per_run() {
    let (dom, diagnostics) =
        parse("<ul>\n  <li>one</li>\n  <li>two <em>three</em> four</li>\n</ul>");
    assert!(diagnostics.is_empty());

    let list = dom.document().first_child().unwrap();
    assert_eq!(child_kinds(list), vec![&element("li"), &element("li")]);
    let second = list.children().nth(1).unwrap();
    assert_eq!(
        child_kinds(second),
        vec![&text("two"), &element("em"), &text("four")]
    );
    // document, ul, 2 li, em, and 4 text nodes
    assert_eq!(dom.len(), 9);
}

#[test]
fn whitespace_only_runs_are_dropped() {
    let (dom, _) = parse("<div>   \n\t  <span> </span>  </div>");
    let div = dom.document().first_child().unwrap();
    assert_eq!(child_kinds(div), vec![&element("span")]);
    assert_eq!(div.first_child().unwrap().child_count(), 0);
}

#[test]
fn empty_input_yields_bare_document() {
    for source in ["", "  \n "] {
        let (dom, diagnostics) = parse(source);
        assert!(dom.is_empty());
        assert_eq!(dom.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has(DiagnosticKind::EmptyInput));
    }
}

#[test]
fn doctype_and_comments_are_discarded() {
    let (dom, diagnostics) = parse("<!DOCTYPE html><!-- note --><p>x</p>");
    assert!(diagnostics.is_empty());
    assert_eq!(child_kinds(dom.document()), vec![&element("p")]);
}

#[test]
fn self_closing_tags_have_no_children() {
    let (dom, diagnostics) = parse("<div><br/><img src=\"a.png\" />after</div>");
    assert!(diagnostics.is_empty());
    let div = dom.document().first_child().unwrap();
    assert_eq!(
        child_kinds(div),
        vec![&element("br"), &element("img"), &text("after")]
    );
    let image = div.children().nth(1).unwrap();
    assert_eq!(image.attr("src"), Some("a.png"));
    assert_eq!(image.child_count(), 0);
}

#[test]
fn unclosed_elements_close_at_end_of_input() {
    let (dom, diagnostics) = parse("<html><body><p>dangling");
    let para = dom
        .document()
        .first_child()
        .and_then(|html| html.first_child())
        .and_then(|body| body.first_child())
        .unwrap();
    assert_eq!(para.tag_name(), Some("p"));
    assert_eq!(child_kinds(para), vec![&text("dangling")]);
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedMarkup), 3);
}

#[test]
fn mismatched_close_tag_closes_one_level() {
    let (dom, diagnostics) = parse("<div><span>x</div>y</span>");
    let div = dom.document().first_child().unwrap();
    // `</div>` closed the span, so "y" lands in the div and `</span>` closes the div.
    assert_eq!(child_kinds(div), vec![&element("span"), &text("y")]);
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedMarkup), 2);
}

#[test]
fn stray_close_tag_at_top_level_is_ignored() {
    let (dom, diagnostics) = parse("</p><div>ok</div>");
    assert_eq!(child_kinds(dom.document()), vec![&element("div")]);
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedMarkup), 1);
}

#[test]
fn duplicate_attribute_first_wins() {
    let (dom, diagnostics) = parse("<p class=\"a\" class=\"b\"></p>");
    let para = dom.document().first_child().unwrap();
    assert_eq!(para.attr("class"), Some("a"));
    assert_eq!(para.attrs().count(), 1);
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedMarkup), 1);
}

#[test]
fn truncated_tag_does_not_abort() {
    let (dom, diagnostics) = parse("<p>before</p><div class=\"x\"");
    assert_eq!(child_kinds(dom.document()), vec![&element("p"), &element("div")]);
    let div = dom.document().children().nth(1).unwrap();
    assert_eq!(div.attr("class"), Some("x"));
    assert!(diagnostics.has(DiagnosticKind::MalformedMarkup));
}

#[test]
fn unterminated_comment_consumes_rest() {
    let (dom, diagnostics) = parse("<p>x</p><!-- never closed");
    assert_eq!(child_kinds(dom.document()), vec![&element("p")]);
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedMarkup), 1);
}

#[test]
fn tag_names_keep_their_case() {
    let (dom, _) = parse("<DIV>x</DIV>");
    assert_eq!(dom.document().first_child().unwrap().tag_name(), Some("DIV"));
}

#[test]
fn non_ascii_text_survives() {
    let (dom, diagnostics) = parse("<p>héllo wörld ✓</p>");
    assert!(diagnostics.is_empty());
    let para = dom.document().first_child().unwrap();
    assert_eq!(para.first_child().unwrap().text(), Some("héllo wörld ✓"));
}

#[test]
fn very_deep_nesting_does_not_overflow_the_stack() {
    init_logging();
    let depth = 50_000;
    let mut source = "<div>".repeat(depth);
    source.push_str("leaf");
    source.push_str(&"</div>".repeat(depth));

    let mut diagnostics = Diagnostics::new();
    let dom = HTMLParser::new(&source, ParserConfig::new(usize::MAX)).parse(&mut diagnostics);
    assert!(diagnostics.is_empty());
    // document + every div + the text node
    assert_eq!(dom.len(), depth + 2);
}

#[test]
fn garbage_input_still_returns_a_tree() {
    let (dom, diagnostics) = parse("<<<>>></></><a b=\"c' d='e\"<f");
    assert!(dom.len() >= 1);
    assert!(diagnostics.has(DiagnosticKind::MalformedMarkup));
}
