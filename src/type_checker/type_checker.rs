use std::rc::Rc;

use log::debug;

use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, ExprKind},
        statements::{BlockStmt, FnDeclStmt, ReturnStmt, Stmt},
        types::{BuiltinType, FunctionType, Type},
    },
    errors::errors::{CompileError, Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
    Position,
};

use super::{scope::ScopeTree, symbols::Symbol};

/// The function whose body is being checked.
#[derive(Debug)]
struct FunctionContext {
    name: String,
    return_type: Option<Type>,
}

/// Two-pass semantic analysis over every program of one package.
///
/// The first pass binds every top-level function in the package scope, so
/// a function is visible to bodies that appear before it. The second pass
/// resolves names and infers expression types, and only runs when the
/// first pass reported nothing.
#[derive(Debug)]
pub struct TypeChecker {
    package: String,
    programs: Vec<Program>,
    scopes: ScopeTree,
    diagnostics: Vec<Diagnostic>,
    function: Option<FunctionContext>,
}

impl TypeChecker {
    pub fn new(package: &str, programs: Vec<Program>) -> Result<Self, CompileError> {
        if programs.is_empty() {
            return Err(CompileError::NoPrograms);
        }

        Ok(TypeChecker {
            package: package.to_string(),
            programs,
            scopes: ScopeTree::new(),
            diagnostics: vec![],
            function: None,
        })
    }

    /// Runs both passes and hands back the same programs, with types
    /// resolved in place, together with every diagnostic.
    pub fn analyze(mut self) -> (Vec<Program>, Vec<Diagnostic>) {
        let mut programs = std::mem::take(&mut self.programs);

        for program in programs.iter_mut() {
            self.collect_program(program);
        }

        debug!(
            "package {}: collected {} symbol(s), {} diagnostic(s)",
            self.package,
            self.scopes.package_scope().len(),
            self.diagnostics.len()
        );

        if self.diagnostics.is_empty() {
            for program in programs.iter_mut() {
                self.check_program(program);
            }

            debug!(
                "package {}: checked {} program(s), {} diagnostic(s)",
                self.package,
                programs.len(),
                self.diagnostics.len()
            );
        }

        (programs, self.diagnostics)
    }

    fn report(&mut self, kind: DiagnosticKind, line: u32, file: &Rc<String>) {
        let diagnostic = Diagnostic::new(kind, Position(line, Rc::clone(file)));
        debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    // Pass 1

    fn collect_program(&mut self, program: &mut Program) {
        let file = Rc::clone(&program.file);

        for stmt in program.statements.iter_mut() {
            match stmt {
                Stmt::FunctionDeclaration(decl) => self.collect_function(decl, &file),
                other => self.report(DiagnosticKind::InvalidTopLevelStatement, other.line(), &file),
            }
        }
    }

    fn collect_function(&mut self, decl: &mut FnDeclStmt, file: &Rc<String>) {
        for parameter in decl.parameters.iter_mut() {
            self.resolve_type(&mut parameter.ty, file);
        }

        if let Some(return_type) = decl.return_type.as_mut() {
            self.resolve_type(return_type, file);
        }

        let symbol = Symbol::Function {
            ty: function_type(decl),
        };

        let position = Position(decl.name.line, Rc::clone(file));
        if let Err(diagnostic) = self.scopes.declare(decl.name.name(), symbol, position) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Replaces a named builtin with its `Builtin` form. Any other name is
    /// unknown and left as written.
    fn resolve_type(&mut self, ty: &mut Type, file: &Rc<String>) {
        match ty {
            Type::Named(token) => match BuiltinType::from_name(token.name()) {
                Some(builtin) => *ty = Type::Builtin(builtin),
                None => {
                    let (name, line) = (token.name().to_string(), token.line);
                    self.report(DiagnosticKind::UnknownType { type_: name }, line, file);
                }
            },
            Type::Function(function) => {
                for parameter in function.parameters.iter_mut() {
                    self.resolve_type(parameter, file);
                }
                if let Some(return_type) = function.return_type.as_mut() {
                    self.resolve_type(return_type, file);
                }
            }
            Type::Builtin(_) | Type::Unknown => {}
        }
    }

    // Pass 2

    fn check_program(&mut self, program: &mut Program) {
        let file = Rc::clone(&program.file);

        for stmt in program.statements.iter_mut() {
            if let Stmt::FunctionDeclaration(decl) = stmt {
                self.check_function(decl, &file);
            }
        }
    }

    fn check_function(&mut self, decl: &mut FnDeclStmt, file: &Rc<String>) {
        let Some(body) = decl.body.as_mut() else {
            return;
        };

        self.scopes.enter();

        for parameter in &decl.parameters {
            let symbol = Symbol::Variable {
                ty: parameter.ty.clone(),
            };
            let position = Position(parameter.name.line, Rc::clone(file));

            if let Err(diagnostic) = self.scopes.declare(parameter.name.name(), symbol, position) {
                self.diagnostics.push(diagnostic);
            }
        }

        self.function = Some(FunctionContext {
            name: decl.name.name().to_string(),
            return_type: decl.return_type.clone(),
        });

        self.check_block(body, file);

        self.function = None;
        self.scopes.leave();
    }

    fn check_block(&mut self, block: &mut BlockStmt, file: &Rc<String>) {
        self.scopes.enter();

        for stmt in block.body.iter_mut() {
            self.check_stmt(stmt, file);
        }

        self.scopes.leave();
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, file: &Rc<String>) {
        match stmt {
            Stmt::FunctionDeclaration(decl) => {
                self.report(DiagnosticKind::InvalidStatementPosition, decl.line, file)
            }
            Stmt::Return(ret) => self.check_return(ret, file),
            Stmt::Expression(stmt) => {
                self.check_expr(&mut stmt.expression, file);
            }
            Stmt::Block(block) => self.check_block(block, file),
        }
    }

    fn check_return(&mut self, ret: &mut ReturnStmt, file: &Rc<String>) {
        let Some(function) = self.function.as_ref() else {
            return;
        };

        let name = function.name.clone();
        let expected = function.return_type.clone();

        match (expected, ret.value.as_mut()) {
            (None, None) => {}
            (None, Some(_)) => {
                self.report(DiagnosticKind::ValueInVoidFunction { function: name }, ret.line, file);
            }
            (Some(expected), None) => self.report(
                DiagnosticKind::MissingReturnValue {
                    function: name,
                    expected: expected.to_string(),
                },
                ret.line,
                file,
            ),
            (Some(expected), Some(value)) => {
                let received = self.check_expr(value, file);

                if !received.is_unknown() && !received.is_same_as(&expected) {
                    self.report(
                        DiagnosticKind::ReturnTypeMismatch {
                            expected: expected.to_string(),
                            received: received.to_string(),
                        },
                        ret.line,
                        file,
                    );
                }
            }
        }
    }

    /// Infers the type of `expr`, stores it on the node and returns it.
    /// A subtree that already failed is `Unknown` and reports nothing further.
    fn check_expr(&mut self, expr: &mut Expr, file: &Rc<String>) -> Type {
        let line = expr.line;

        let inferred = match &mut expr.kind {
            ExprKind::Literal(token) => match BuiltinType::from_literal(token.kind) {
                Some(builtin) => Type::Builtin(builtin),
                None => {
                    let literal = token.lexeme.clone();
                    self.report(DiagnosticKind::UnsupportedLiteral { literal }, line, file);
                    Type::Unknown
                }
            },
            ExprKind::Identifier(token) => match self.scopes.lookup(token.name()) {
                Some(symbol) => symbol.get_type(),
                None => {
                    let name = token.name().to_string();
                    self.report(DiagnosticKind::NotDefined { name }, line, file);
                    Type::Unknown
                }
            },
            ExprKind::Unary(unary) => {
                let operand = self.check_expr(&mut unary.operand, file);
                let operator = unary.operator.lexeme.clone();

                if !matches!(unary.operator.kind, TokenKind::Plus | TokenKind::Dash) {
                    self.report(DiagnosticKind::InvalidUnaryOperator { operator }, line, file);
                    Type::Unknown
                } else if operand.is_unknown() {
                    Type::Unknown
                } else if !operand.is_numeric() {
                    self.report(
                        DiagnosticKind::NonNumericOperand {
                            operator,
                            operand: operand.to_string(),
                        },
                        line,
                        file,
                    );
                    Type::Unknown
                } else {
                    operand
                }
            }
            ExprKind::Binary(binary) => {
                let left = self.check_expr(&mut binary.left, file);
                let right = self.check_expr(&mut binary.right, file);

                if left.is_unknown() || right.is_unknown() {
                    Type::Unknown
                } else if !left.is_same_as(&right) {
                    self.report(
                        DiagnosticKind::TypeMatchError {
                            left: left.to_string(),
                            right: right.to_string(),
                        },
                        line,
                        file,
                    );
                    Type::Unknown
                } else if is_relational(binary.operator.kind) {
                    Type::Builtin(BuiltinType::Bool)
                } else {
                    left
                }
            }
            ExprKind::Call(_) => {
                let construct = String::from("call");
                self.report(DiagnosticKind::NotSupportedYet { construct }, line, file);
                Type::Unknown
            }
            ExprKind::Indexed(_) => {
                let construct = String::from("index");
                self.report(DiagnosticKind::NotSupportedYet { construct }, line, file);
                Type::Unknown
            }
        };

        expr.inferred_type = inferred.clone();
        inferred
    }
}

fn is_relational(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equals
            | TokenKind::NotEquals
            | TokenKind::Less
            | TokenKind::Greater
            | TokenKind::LessEquals
            | TokenKind::GreaterEquals
    )
}

/// The `Function` type of a declaration, from its (resolved) signature.
pub fn function_type(decl: &FnDeclStmt) -> FunctionType {
    FunctionType {
        return_type: decl.return_type.clone().map(Box::new),
        parameters: decl.parameters.iter().map(|p| p.ty.clone()).collect(),
    }
}

/// Analyzes the programs of one package.
pub fn analyze(
    package: &str,
    programs: Vec<Program>,
) -> Result<(Vec<Program>, Vec<Diagnostic>), CompileError> {
    Ok(TypeChecker::new(package, programs)?.analyze())
}
