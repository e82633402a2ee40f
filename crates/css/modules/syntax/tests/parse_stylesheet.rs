#![cfg(test)]

use css_syntax::{Declaration, StyleRule, Stylesheet, parse_stylesheet};
use diagnostics::{DiagnosticKind, Diagnostics};

fn init_logging() {
    drop(env_logger::builder().is_test(true).try_init());
}

fn parse(css: &str) -> (Stylesheet, Diagnostics) {
    init_logging();
    let mut diagnostics = Diagnostics::new();
    let sheet = parse_stylesheet(css, &mut diagnostics);
    (sheet, diagnostics)
}

#[test]
fn rules_keep_source_order() {
    let (sheet, diagnostics) = parse(
        "body { color: black; background-color: white; }\n\
         h1 { font-size: 24px; }\n\
         #main { margin: 0 auto; }\n\
         .test { color: red; }",
    );
    assert!(diagnostics.is_empty());
    let preludes: Vec<&str> = sheet.rules.iter().map(|rule| rule.prelude.as_str()).collect();
    assert_eq!(preludes, vec!["body", "h1", "#main", ".test"]);
    assert_eq!(
        sheet.rules[0].declarations,
        vec![
            Declaration::new("color", "black"),
            Declaration::new("background-color", "white"),
        ]
    );
    assert_eq!(
        sheet.rules[2].declarations,
        vec![Declaration::new("margin", "0 auto")]
    );
}

#[test]
fn last_declaration_needs_no_semicolon() {
    let (sheet, diagnostics) = parse("p { color: red; margin: 0 }");
    assert!(diagnostics.is_empty());
    assert_eq!(
        sheet.rules[0].declarations,
        vec![
            Declaration::new("color", "red"),
            Declaration::new("margin", "0"),
        ]
    );
}

#[test]
fn empty_block_keeps_the_rule() {
    let (sheet, diagnostics) = parse("div {}");
    assert!(diagnostics.is_empty());
    assert_eq!(
        sheet.rules,
        vec![StyleRule {
            prelude: String::from("div"),
            declarations: Vec::new(),
        }]
    );
}

#[test]
fn unterminated_block_keeps_what_was_read() {
    let (sheet, diagnostics) = parse("a { color: red;");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].prelude, "a");
    assert_eq!(
        sheet.rules[0].declarations,
        vec![Declaration::new("color", "red")]
    );
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedStylesheet), 1);
}

#[test]
fn selector_without_block_stops_parsing() {
    let (sheet, diagnostics) = parse("a { color: red; } dangling");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedStylesheet), 1);
}

#[test]
fn blank_input_is_an_empty_sheet() {
    for source in ["", " \n\t "] {
        let (sheet, diagnostics) = parse(source);
        assert!(sheet.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has(DiagnosticKind::EmptyInput));
    }
}

#[test]
fn values_are_raw_text() {
    let (sheet, _) = parse("p { font-family: \"Fira Sans\", serif; color: red !important; }");
    assert_eq!(
        sheet.rules[0].declarations,
        vec![
            Declaration::new("font-family", "\"Fira Sans\", serif"),
            Declaration::new("color", "red !important"),
        ]
    );
}

#[test]
fn non_ascii_text_survives() {
    let (sheet, diagnostics) = parse("p.ünï { content: \"✓\"; }");
    assert!(diagnostics.is_empty());
    assert_eq!(sheet.rules[0].prelude, "p.ünï");
    assert_eq!(sheet.rules[0].declarations[0].value, "\"✓\"");
}

#[test]
fn parsing_is_deterministic() {
    let source = "a { x: 1; } b { y: 2; z }";
    let (first, first_diagnostics) = parse(source);
    let (second, second_diagnostics) = parse(source);
    assert_eq!(first, second);
    assert_eq!(first_diagnostics, second_diagnostics);
}
