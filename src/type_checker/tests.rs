//! Unit tests for the semantic analyzer.
//!
//! This module covers symbol collection, name resolution through nested
//! scopes, type inference and the structural rules of the language.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    scope::ScopeTree,
    symbols::Symbol,
    type_checker::{analyze, TypeChecker},
};
use crate::{
    ast::{
        ast::Program,
        expressions::Expr,
        statements::Stmt,
        types::{BuiltinType, FunctionType, Type},
    },
    errors::errors::{CompileError, Diagnostic, DiagnosticKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

fn program(source: &str, file: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some(file.to_string())).unwrap();
    let (program, diagnostics) = parse(tokens, Rc::new(file.to_string()));
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    program
}

fn check(source: &str) -> (Vec<Program>, Vec<Diagnostic>) {
    analyze("main", vec![program(source, "test.fr")]).unwrap()
}

fn kinds(source: &str) -> Vec<DiagnosticKind> {
    let (_, diagnostics) = check(source);
    diagnostics.iter().map(|d| d.kind().clone()).collect()
}

/// The value of the first `return` in the body of the function at `index`.
fn returned_expr(program: &Program, index: usize) -> &Expr {
    let Stmt::FunctionDeclaration(decl) = &program.statements[index] else {
        panic!("expected a function declaration");
    };

    decl.body
        .as_ref()
        .and_then(|body| {
            body.body.iter().find_map(|stmt| match stmt {
                Stmt::Return(ret) => ret.value.as_ref(),
                _ => None,
            })
        })
        .expect("function returns a value")
}

fn position(line: u32) -> Position {
    Position(line, Rc::new("scope.fr".to_string()))
}

#[test]
fn test_value_in_void_function() {
    assert_eq!(
        kinds("func main() { return 5; }"),
        vec![DiagnosticKind::ValueInVoidFunction {
            function: "main".to_string()
        }]
    );
}

#[test]
fn test_typed_return() {
    let (programs, diagnostics) = check("func main() i64 { return 5; }");

    assert!(diagnostics.is_empty());
    assert_eq!(
        returned_expr(&programs[0], 0).inferred_type,
        Type::Builtin(BuiltinType::I64)
    );
}

#[test]
fn test_return_type_mismatch() {
    let (_, diagnostics) = check("func f() f32 {\n  return 1;\n}");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::ReturnTypeMismatch {
            expected: "f32".to_string(),
            received: "i64".to_string()
        }
    );
    assert_eq!(diagnostics[0].line(), 2);
}

#[test]
fn test_missing_return_value() {
    assert_eq!(
        kinds("func f() i64 { return; }"),
        vec![DiagnosticKind::MissingReturnValue {
            function: "f".to_string(),
            expected: "i64".to_string()
        }]
    );
}

#[test]
fn test_void_return_without_value() {
    assert!(kinds("func f() { return; }").is_empty());
}

#[test]
fn test_duplicate_function() {
    let (_, diagnostics) = check("func f() i64;\nfunc f() i32 { return 1i; }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::Redefinition {
            name: "f".to_string()
        }
    );
    assert_eq!(diagnostics[0].line(), 2);
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        kinds("func f(a i64, a i64) {}"),
        vec![DiagnosticKind::Redefinition {
            name: "a".to_string()
        }]
    );
}

#[test]
fn test_forward_visibility() {
    let (programs, diagnostics) = check("func main() { helper; }\nfunc helper() {}");

    assert!(diagnostics.is_empty());

    let Stmt::FunctionDeclaration(decl) = &programs[0].statements[0] else {
        panic!("expected a function declaration");
    };
    let Stmt::Expression(stmt) = &decl.body.as_ref().unwrap().body[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(
        stmt.expression.inferred_type,
        Type::Function(FunctionType {
            return_type: None,
            parameters: vec![],
        })
    );
}

#[test]
fn test_parameters_resolve() {
    let (programs, diagnostics) = check("func add(a i64, b i64) i64 { return a + b; }");

    assert!(diagnostics.is_empty());
    assert_eq!(
        returned_expr(&programs[0], 0).inferred_type,
        Type::Builtin(BuiltinType::I64)
    );
}

#[test]
fn test_parameter_shadows_function() {
    let source = "func a() {}\nfunc b(a i64) i64 { return a; }\nfunc c() i64 { return a; }";
    let (_, diagnostics) = check(source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::ReturnTypeMismatch {
            expected: "i64".to_string(),
            received: "func()".to_string()
        }
    );
    assert_eq!(diagnostics[0].line(), 3);
}

#[test]
fn test_not_defined() {
    assert_eq!(
        kinds("func main() { x; }"),
        vec![DiagnosticKind::NotDefined {
            name: "x".to_string()
        }]
    );
}

#[test]
fn test_no_cascade_from_unknown() {
    assert_eq!(
        kinds("func main() i64 { return -(x + 1) * 2; }"),
        vec![DiagnosticKind::NotDefined {
            name: "x".to_string()
        }]
    );
}

#[test]
fn test_binary_type_mismatch() {
    assert_eq!(
        kinds("func main() { 1 + 1i; }"),
        vec![DiagnosticKind::TypeMatchError {
            left: "i64".to_string(),
            right: "i32".to_string()
        }]
    );
}

#[test]
fn test_binary_keeps_operand_type() {
    let (programs, diagnostics) = check("func f(x f32) f32 { return x * 2.0f - x; }");

    assert!(diagnostics.is_empty());
    assert_eq!(
        returned_expr(&programs[0], 0).inferred_type,
        Type::Builtin(BuiltinType::F32)
    );
}

#[test]
fn test_relational_yields_bool() {
    let (programs, diagnostics) = check("func lt(a u8, b u8) bool { return a < b; }");

    assert!(diagnostics.is_empty());
    assert_eq!(
        returned_expr(&programs[0], 0).inferred_type,
        Type::Builtin(BuiltinType::Bool)
    );
}

#[test]
fn test_unary_numeric_only() {
    assert_eq!(
        kinds("func main() { -(1 < 2); }"),
        vec![DiagnosticKind::NonNumericOperand {
            operator: "-".to_string(),
            operand: "bool".to_string()
        }]
    );
    assert!(kinds("func main(x f64) f64 { return -x; }").is_empty());
    assert!(kinds("func main(x u16) u16 { return +x; }").is_empty());
}

#[test]
fn test_invalid_unary_operator() {
    assert_eq!(
        kinds("func main(p ptr) { *p; }"),
        vec![DiagnosticKind::InvalidUnaryOperator {
            operator: "*".to_string()
        }]
    );
}

#[test]
fn test_call_and_index_not_supported() {
    assert_eq!(
        kinds("func f() {}\nfunc main(a i64) { f(); a[0]; }"),
        vec![
            DiagnosticKind::NotSupportedYet {
                construct: "call".to_string()
            },
            DiagnosticKind::NotSupportedYet {
                construct: "index".to_string()
            },
        ]
    );
}

#[test]
fn test_unsupported_literals() {
    assert_eq!(
        kinds("func main() { \"s\"; 'c'; }"),
        vec![
            DiagnosticKind::UnsupportedLiteral {
                literal: "\"s\"".to_string()
            },
            DiagnosticKind::UnsupportedLiteral {
                literal: "'c'".to_string()
            },
        ]
    );
}

#[test]
fn test_top_level_statement_gates_second_pass() {
    let (_, diagnostics) = check("1 + 2;\nfunc main() { x; }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), &DiagnosticKind::InvalidTopLevelStatement);
    assert_eq!(diagnostics[0].line(), 1);
}

#[test]
fn test_unknown_type() {
    assert_eq!(
        kinds("func f(a int) {}"),
        vec![DiagnosticKind::UnknownType {
            type_: "int".to_string()
        }]
    );
}

#[test]
fn test_types_resolved_in_place() {
    let (programs, _) = check("func f(a u32) ptr;");

    let Stmt::FunctionDeclaration(decl) = &programs[0].statements[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(decl.parameters[0].ty, Type::Builtin(BuiltinType::U32));
    assert_eq!(decl.return_type, Some(Type::Builtin(BuiltinType::Ptr)));
}

#[test]
fn test_nested_function_declaration() {
    assert_eq!(
        kinds("func main() { func inner() {} }"),
        vec![DiagnosticKind::InvalidStatementPosition]
    );
}

#[test]
fn test_reanalysis_is_stable() {
    let source = "func add(a i64, b i64) i64 { return a + b; }\nfunc main() { add; { 1 < 2; } }";
    let (first, diagnostics) = check(source);
    assert!(diagnostics.is_empty());

    let (second, diagnostics) = analyze("main", first.clone()).unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(second, first);
}

#[test]
fn test_package_spans_programs() {
    let a = program("func main() i64 { return answer; }", "a.fr");
    let b = program("func answer() {}\nfunc main() {}", "b.fr");

    let (programs, diagnostics) = analyze("pkg", vec![a, b]).unwrap();

    assert_eq!(programs.len(), 2);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].file(), "b.fr");
    assert_eq!(diagnostics[0].line(), 2);
}

#[test]
fn test_no_programs() {
    assert!(matches!(
        TypeChecker::new("main", vec![]),
        Err(CompileError::NoPrograms)
    ));
}

#[test]
fn test_scope_shadowing() {
    let outer = Symbol::Variable {
        ty: Type::Builtin(BuiltinType::I64),
    };
    let inner = Symbol::Variable {
        ty: Type::Builtin(BuiltinType::F64),
    };

    let mut scopes = ScopeTree::new();
    scopes.declare("x", outer.clone(), position(1)).unwrap();

    scopes.enter();
    scopes.declare("x", inner.clone(), position(2)).unwrap();
    assert_eq!(scopes.lookup("x"), Some(&inner));
    assert_eq!(scopes.depth(), 2);

    scopes.leave();
    assert_eq!(scopes.lookup("x"), Some(&outer));
    assert_eq!(scopes.depth(), 1);
}

#[test]
fn test_sibling_scopes_do_not_share() {
    let mut scopes = ScopeTree::new();

    scopes.enter();
    scopes
        .declare("y", Symbol::Variable { ty: Type::Unknown }, position(1))
        .unwrap();
    scopes.leave();

    scopes.enter();
    assert_eq!(scopes.lookup("y"), None);
}

#[test]
fn test_scope_redefinition_keeps_first() {
    let first = Symbol::Function {
        ty: FunctionType {
            return_type: None,
            parameters: vec![],
        },
    };
    let second = Symbol::Variable {
        ty: Type::Builtin(BuiltinType::Bool),
    };

    let mut scopes = ScopeTree::new();
    scopes.declare("f", first.clone(), position(1)).unwrap();

    let error = scopes.declare("f", second, position(4)).unwrap_err();
    assert_eq!(error.get_error_name(), "Redefinition");
    assert_eq!(error.line(), 4);
    assert_eq!(scopes.lookup("f"), Some(&first));
}

#[test]
fn test_package_scope_is_never_left() {
    let mut scopes = ScopeTree::new();
    scopes
        .declare("g", Symbol::Variable { ty: Type::Unknown }, position(1))
        .unwrap();

    scopes.leave();

    assert_eq!(scopes.depth(), 1);
    assert!(scopes.lookup("g").is_some());
    assert_eq!(scopes.package_scope().parent(), None);
}
