use std::io::Write;

use crate::ast::{
    ast::Program,
    expressions::{Expr, ExprKind},
    statements::{BlockStmt, FnDeclStmt, Stmt},
};

use super::compiler::{CodeGenerator, CodegenError};

/// Dumps the checked programs as S-expressions, every expression suffixed
/// with its inferred type: `(+ a:i64 1:i64):i64`.
pub struct TreeGenerator {
    module: String,
}

impl TreeGenerator {
    pub fn new(module: &str) -> Self {
        TreeGenerator {
            module: module.to_string(),
        }
    }
}

impl CodeGenerator for TreeGenerator {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn generate(&mut self, programs: &[Program], sink: &mut dyn Write) -> Result<(), CodegenError> {
        writeln!(sink, "(module {:?}", self.module)?;

        for program in programs {
            writeln!(sink, "  (program {:?}", program.file.as_str())?;
            for stmt in &program.statements {
                writeln!(sink, "    {}", typed_stmt(stmt))?;
            }
            writeln!(sink, "  )")?;
        }

        writeln!(sink, ")")?;
        Ok(())
    }
}

pub fn typed_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::FunctionDeclaration(decl) => typed_function(decl),
        Stmt::Return(ret) => match &ret.value {
            Some(value) => format!("(return {})", typed_expr(value)),
            None => String::from("(return)"),
        },
        Stmt::Expression(stmt) => format!("(expr {})", typed_expr(&stmt.expression)),
        Stmt::Block(block) => typed_block(block),
    }
}

fn typed_block(block: &BlockStmt) -> String {
    let mut out = String::from("(block");
    for stmt in &block.body {
        out.push(' ');
        out.push_str(&typed_stmt(stmt));
    }
    out.push(')');
    out
}

fn typed_function(decl: &FnDeclStmt) -> String {
    let parameters = decl
        .parameters
        .iter()
        .map(|p| format!("({} {})", p.name.name(), p.ty))
        .collect::<Vec<String>>()
        .join(" ");

    let return_type = match &decl.return_type {
        Some(ty) => ty.to_string(),
        None => String::from("void"),
    };

    match &decl.body {
        Some(body) => format!(
            "(func {} ({}) {} {})",
            decl.name.name(),
            parameters,
            return_type,
            typed_block(body)
        ),
        None => format!("(func {} ({}) {})", decl.name.name(), parameters, return_type),
    }
}

pub fn typed_expr(expr: &Expr) -> String {
    let body = match &expr.kind {
        ExprKind::Literal(token) => token.lexeme.clone(),
        ExprKind::Identifier(token) => token.name().to_string(),
        ExprKind::Unary(unary) => format!("({} {})", unary.operator.lexeme, typed_expr(&unary.operand)),
        ExprKind::Binary(binary) => format!(
            "({} {} {})",
            binary.operator.lexeme,
            typed_expr(&binary.left),
            typed_expr(&binary.right)
        ),
        ExprKind::Call(call) => format!("(call {}{})", typed_expr(&call.callee), typed_list(&call.arguments)),
        ExprKind::Indexed(indexed) => {
            format!("(index {}{})", typed_expr(&indexed.base), typed_list(&indexed.indices))
        }
    };

    format!("{}:{}", body, expr.inferred_type)
}

fn typed_list(items: &[Expr]) -> String {
    items.iter().map(|item| format!(" {}", typed_expr(item))).collect()
}
