//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//! - Operator precedence and associativity
//! - Prefix, call and index expressions
//! - Function declarations, returns and blocks
//! - Error recovery on malformed input

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::parser::{parse, MAX_NESTING};
use crate::{
    ast::{ast::Program, statements::Stmt, types::Type},
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::{
        lexer::{scan_all, tokenize},
        tokens::TokenKind,
    },
};

fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
    let tokens = tokenize(source.to_string(), Some("test.fr".to_string())).unwrap();
    parse(tokens, Rc::new("test.fr".to_string()))
}

/// Parses `source` as a single expression statement and prints it.
fn expr(source: &str) -> String {
    let (program, diagnostics) = parse_source(&format!("{};", source));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(program.statements.len(), 1);

    match &program.statements[0] {
        Stmt::Expression(stmt) => stmt.expression.to_string(),
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn single_diagnostic(source: &str) -> (Program, DiagnosticKind) {
    let (program, diagnostics) = parse_source(source);
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    (program, diagnostics[0].kind().clone())
}

#[test]
fn test_left_associative_subtraction() {
    assert_eq!(expr("1-2-3"), "(- (- 1 2) 3)");
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(expr("1+2*3"), "(+ 1 (* 2 3))");
    assert_eq!(expr("1*2+3"), "(+ (* 1 2) 3)");
    assert_eq!(expr("8/4%3"), "(% (/ 8 4) 3)");
}

#[test]
fn test_grouping() {
    assert_eq!(expr("(1+2)*3"), "(* (+ 1 2) 3)");
    assert_eq!(expr("((a))"), "a");
}

#[test]
fn test_relational_operators() {
    assert_eq!(expr("a < b + 1"), "(< a (+ b 1))");
    assert_eq!(expr("1 == 2 == 3"), "(== (== 1 2) 3)");
    assert_eq!(expr("a * 2 >= b - 1"), "(>= (* a 2) (- b 1))");
}

#[test]
fn test_prefix_operators() {
    assert_eq!(expr("-a*b"), "(* (- a) b)");
    assert_eq!(expr("- -x"), "(- (- x))");
    assert_eq!(expr("+a - b"), "(- (+ a) b)");
    assert_eq!(expr("*p+1"), "(+ (* p) 1)");
    assert_eq!(expr("-f(1)"), "(- (call f 1))");
}

#[test]
fn test_call_and_index() {
    assert_eq!(expr("f()"), "(call f)");
    assert_eq!(expr("f(1, 2)(3)"), "(call (call f 1 2) 3)");
    assert_eq!(expr("a[1, 2]"), "(index a 1 2)");
    assert_eq!(expr("m[i][j] * 2"), "(* (index (index m i) j) 2)");
    assert_eq!(expr("f(a + 1, g(b))"), "(call f (+ a 1) (call g b))");
}

#[test]
fn test_literal_tokens_are_kept() {
    assert_eq!(expr("1.5f + 2.5f"), "(+ 1.5f 2.5f)");
    assert_eq!(expr("'c'"), "'c'");
    assert_eq!(expr("\"s\""), "\"s\"");
}

#[test]
fn test_expression_line() {
    let (program, _) = parse_source("\n\na + b;");

    assert_eq!(program.statements[0].line(), 3);
}

#[test]
fn test_parse_function_declaration() {
    let (program, diagnostics) = parse_source("func add(a i64, b i64) i64 { return a + b; }");

    assert!(diagnostics.is_empty());
    assert_eq!(
        program.statements[0].to_string(),
        "(func add ((a i64) (b i64)) i64 (block (return (+ a b))))"
    );
}

#[test]
fn test_parse_function_declaration_fields() {
    let (program, _) = parse_source("func main() {\n  return;\n}");

    let Stmt::FunctionDeclaration(decl) = &program.statements[0] else {
        panic!("expected a function declaration");
    };

    assert_eq!(decl.name.name(), "main");
    assert!(decl.parameters.is_empty());
    assert_eq!(decl.return_type, None);
    assert_eq!(decl.line, 1);

    let body = decl.body.as_ref().unwrap();
    assert_eq!(body.body.len(), 1);
    assert_eq!(body.body[0].line(), 2);
    assert_eq!(body.body[0].to_string(), "(return)");
}

#[test]
fn test_parse_forward_declaration() {
    let (program, diagnostics) = parse_source("func ext(x f64);");

    assert!(diagnostics.is_empty());
    assert_eq!(program.statements[0].to_string(), "(func ext ((x f64)) void)");

    let Stmt::FunctionDeclaration(decl) = &program.statements[0] else {
        panic!("expected a function declaration");
    };
    assert!(decl.body.is_none());
    assert!(matches!(&decl.parameters[0].ty, Type::Named(token) if token.name() == "f64"));
}

#[test]
fn test_parse_nested_blocks() {
    let (program, diagnostics) = parse_source("func f() { { a; } b; }");

    assert!(diagnostics.is_empty());
    assert_eq!(
        program.statements[0].to_string(),
        "(func f () void (block (block (expr a)) (expr b)))"
    );
}

#[test]
fn test_top_level_statements_parse() {
    let (program, diagnostics) = parse_source("return 5; 1 + 2;");

    assert!(diagnostics.is_empty());
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_program_display() {
    let (program, _) = parse_source("func a() {} func b() i32;");

    assert_eq!(
        program.to_string(),
        "(program \"test.fr\"\n  (func a () void (block))\n  (func b () i32)\n)"
    );
    assert_eq!(program.functions().count(), 2);
}

#[test]
fn test_missing_semicolon() {
    let (program, kind) = single_diagnostic("func main() i64 {\n  return 1\n}");

    assert_eq!(
        kind,
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::Semicolon,
            found: "}".to_string()
        }
    );
    assert_eq!(program.statements[0].to_string(), "(func main () i64 (block))");
}

#[test]
fn test_diagnostic_line_is_current_token() {
    let (_, diagnostics) = parse_source("func main() i64 {\n  return 1\n}");

    assert_eq!(diagnostics[0].line(), 3);
    assert_eq!(diagnostics[0].file(), "test.fr");
}

#[test]
fn test_recovery_inside_block() {
    let (program, kind) = single_diagnostic("func a() { x +; y; }");

    assert_eq!(kind, DiagnosticKind::ExpectedExpression { found: ";".to_string() });
    assert_eq!(program.statements[0].to_string(), "(func a () void (block (expr y)))");
}

#[test]
fn test_recovery_at_top_level_resumes_at_func() {
    let (program, kind) = single_diagnostic("func a( { } func b() {}");

    assert_eq!(
        kind,
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::Identifier,
            found: "{".to_string()
        }
    );
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.statements[0].to_string(), "(func b () void (block))");
}

#[test]
fn test_several_errors_are_all_reported() {
    let (program, diagnostics) = parse_source("func 5() {}\nfunc f(a) {}\nfunc ok() {}");

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::ExpectedToken {
            expected: TokenKind::Identifier,
            found: "5".to_string()
        }
    );
    assert_eq!(diagnostics[1].kind(), &DiagnosticKind::InvalidType { found: ")".to_string() });
    assert_eq!(diagnostics[1].line(), 2);
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_stray_token_makes_progress() {
    let (program, diagnostics) = parse_source(") ) func f() {}");

    assert!(!diagnostics.is_empty());
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::ExpectedExpression { found: ")".to_string() }
    );
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_missing_close_paren() {
    let (_, kind) = single_diagnostic("(1 + 2;");

    assert_eq!(
        kind,
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::CloseParen,
            found: ";".to_string()
        }
    );
}

#[test]
fn test_bad_argument_separator() {
    let (_, kind) = single_diagnostic("f(1 2);");

    assert_eq!(
        kind,
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::CloseParen,
            found: "2".to_string()
        }
    );
}

#[test]
fn test_empty_index() {
    let (_, kind) = single_diagnostic("a[];");

    assert_eq!(kind, DiagnosticKind::ExpectedExpression { found: "]".to_string() });
}

#[test]
fn test_unclosed_block() {
    let (_, kind) = single_diagnostic("func f() { a;");

    assert_eq!(
        kind,
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::CloseCurly,
            found: "EOF".to_string()
        }
    );
}

#[test]
fn test_error_token_has_no_prefix_handler() {
    let (tokens, lexical) = scan_all("@".to_string(), Some("bad.fr".to_string()));
    assert_eq!(lexical.len(), 1);

    let (program, diagnostics) = parse(tokens, Rc::new("bad.fr".to_string()));

    assert!(program.statements.is_empty());
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::ExpectedExpression { found: "@".to_string() }
    );
}

#[test]
fn test_empty_token_stream() {
    let (program, diagnostics) = parse(vec![], Rc::new("empty.fr".to_string()));

    assert!(program.statements.is_empty());
    assert!(diagnostics.is_empty());
    assert_eq!(program.file.as_str(), "empty.fr");
}

fn first_kind(source: &str) -> DiagnosticKind {
    let (tokens, lexical) = scan_all(source.to_string(), Some("test.fr".to_string()));
    assert!(lexical.is_empty(), "{:?}", lexical);

    let (_, diagnostics) = parse(tokens, Rc::new("test.fr".to_string()));
    assert!(!diagnostics.is_empty());
    diagnostics[0].kind().clone()
}

#[test]
fn test_deep_grouping_is_rejected() {
    let source = format!("{}1{};", "(".repeat(600), ")".repeat(600));

    assert_eq!(first_kind(&source), DiagnosticKind::NestingTooDeep { limit: MAX_NESTING });
}

#[test]
fn test_deep_prefix_chain_is_rejected() {
    let source = format!("{}x;", "-".repeat(600));

    assert_eq!(first_kind(&source), DiagnosticKind::NestingTooDeep { limit: MAX_NESTING });
}

#[test]
fn test_long_operator_chain_is_rejected() {
    let source = format!("{};", vec!["1"; 1000].join(" + "));

    assert_eq!(first_kind(&source), DiagnosticKind::NestingTooDeep { limit: MAX_NESTING });
}

#[test]
fn test_deep_blocks_are_rejected() {
    let source = format!("func f() {}{}", "{".repeat(600), "}".repeat(600));

    assert_eq!(first_kind(&source), DiagnosticKind::NestingTooDeep { limit: MAX_NESTING });
}

#[test]
fn test_moderate_nesting_parses() {
    let grouped = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(expr(&grouped), "1");

    let chain = vec!["1"; 100].join(" + ");
    assert!(expr(&chain).starts_with("(+ (+ "));

    let (program, diagnostics) =
        parse_source(&format!("func f() {}{}", "{".repeat(100), "}".repeat(100)));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_nesting_depth_resets_after_error() {
    let source = format!("{}1{};\nfunc ok() {{ return (((1))); }}", "(".repeat(600), ")".repeat(600));
    let (program, diagnostics) = parse_source(&source);

    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    assert_eq!(program.statements.len(), 1);
}
