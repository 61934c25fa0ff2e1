//! Integration tests for failure diagnostics
//!
//! These tests check that the reported position is the deepest failure,
//! and that line, column, caret and lookahead are rendered against the
//! right source line.

use pegrow::prelude::*;
use pegrow::Expected;

fn build_statements() -> Grammar {
    GrammarBuilder::new()
        .rule("program", AltSpec::new("{ <stmt> }:stmts").action(|a| a["stmts"].clone()))
        .rule("stmt", AltSpec::new("'let' <ident:name> '=' <expr:value> ';'"))
        .rule(
            "expr",
            AltSpec::new("<expr:l> '+' <expr:r>").precedence(10).left().action(|a| {
                Value::int(a["l"].as_int().unwrap_or(0) + a["r"].as_int().unwrap_or(0))
            }),
        )
        .alt(AltSpec::new("'(' <expr> ')'"))
        .alt(AltSpec::new("<number>"))
        .token(Token::new("ident", r"[a-z]+"))
        .token(Token::new("number", r"[0-9]+").converter(|s| Value::int(s.parse().unwrap_or(0))))
        .build()
        .unwrap()
}

#[test]
fn test_valid_program() {
    let grammar = build_statements();
    let value = grammar.parse("let a = 1;\nlet b = 2 + 3;").unwrap();
    assert_eq!(
        value,
        Value::list(vec![
            Value::tuple(vec![Value::string("a"), Value::int(1)]),
            Value::tuple(vec![Value::string("b"), Value::int(5)]),
        ])
    );
}

#[test]
fn test_failure_on_second_line() {
    let grammar = build_statements();
    let input = "let a = 1;\nlet b = 2 + ;";
    let err = grammar.parse(input).unwrap_err();
    let d = err.diagnostic().unwrap();

    assert_eq!(d.line(), 2);
    assert_eq!(d.column(), 13);
    assert_eq!(d.offset(), input.find(" ;").unwrap() + 1);
    assert_eq!(d.line_text, "let b = 2 + ;");
    assert_eq!(d.caret_line(), "            ^");
    assert_eq!(d.lookahead, ";");
    assert_eq!(d.expected, vec![Expected::Literal("(".into()), Expected::Token("number".into())]);
}

#[test]
fn test_rendered_report() {
    let grammar = build_statements();
    let err = grammar.parse("let x = (1 + 2;").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error at line 1, column 15:\nlet x = (1 + 2;\n              ^\nExpected '+' or ')', found \";\""
    );
}

#[test]
fn test_deepest_failure_wins() {
    let grammar = build_statements();
    // The first statement parses; the second fails deep inside its expression.
    let err = grammar.parse("let a = 1;\nlet b = (((1 + x").unwrap_err();
    let d = err.diagnostic().unwrap();
    assert_eq!(d.line(), 2);
    assert_eq!(d.column(), 16);
    assert_eq!(d.found(), "\"x\"");
}

#[test]
fn test_lookahead_is_truncated() {
    let grammar = build_statements();
    let config = ParserConfig::new().with_lookahead_len(4);
    let err = Parser::with_config(&grammar, config)
        .parse("let a = 1; oops and more")
        .unwrap_err();
    let d = err.diagnostic().unwrap();
    assert_eq!(d.lookahead, "oops");
    assert_eq!(d.column(), 12);
}

#[test]
fn test_unexpected_end_of_input() {
    let grammar = build_statements();
    let err = grammar.parse("let a = ").unwrap_err();
    let d = err.diagnostic().unwrap();
    assert_eq!(d.column(), 9);
    assert_eq!(d.found(), "end of input");
    assert!(d.render().ends_with("Expected '(' or <number>, found end of input"));
}

#[test]
fn test_caret_under_tab_indented_line() {
    let grammar = build_statements();
    let err = grammar.parse("let a = 1;\n\tlet = 2;").unwrap_err();
    let d = err.diagnostic().unwrap();
    assert_eq!(d.line(), 2);
    assert_eq!(d.column(), 6);
    assert_eq!(d.caret_line(), "\t    ^");
}

#[test]
fn test_grammar_errors_are_reported() {
    let err = GrammarBuilder::new()
        .rule("a", AltSpec::new("<b:x> <c:x>"))
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Duplicate capture name `x` in pattern \"<b:x> <c:x>\""
    );

    let err = GrammarBuilder::new()
        .rule("a", AltSpec::new("'unterminated"))
        .build()
        .unwrap_err();
    assert!(matches!(err, GrammarError::PatternSyntax { .. }));
}
