use std::fmt::Display;

use serde::Serialize;

use crate::lexer::tokens::Token;

use super::{expressions::Expr, types::Type};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    FunctionDeclaration(FnDeclStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
    Block(BlockStmt),
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::FunctionDeclaration(stmt) => stmt.line,
            Stmt::Return(stmt) => stmt.line,
            Stmt::Expression(stmt) => stmt.line,
            Stmt::Block(stmt) => stmt.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: Token,
    pub ty: Type,
}

/// Function Declaration Statement
/// A declaration without a body is a forward declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FnDeclStmt {
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub body: Option<BlockStmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub line: u32,
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::FunctionDeclaration(decl) => write!(f, "{}", decl),
            Stmt::Return(ReturnStmt { value: Some(value), .. }) => write!(f, "(return {})", value),
            Stmt::Return(ReturnStmt { value: None, .. }) => write!(f, "(return)"),
            Stmt::Expression(stmt) => write!(f, "(expr {})", stmt.expression),
            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(block")?;
        for stmt in &self.body {
            write!(f, " {}", stmt)?;
        }
        write!(f, ")")
    }
}

/// `(func name ((a i64) (b i64)) i64 (block ...))`, with `void` for a missing
/// return type and no block for a forward declaration.
impl Display for FnDeclStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(func {} (", self.name.name())?;
        for (idx, parameter) in self.parameters.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "({} {})", parameter.name.name(), parameter.ty)?;
        }
        write!(f, ")")?;

        match &self.return_type {
            Some(return_type) => write!(f, " {}", return_type)?,
            None => write!(f, " void")?,
        }

        if let Some(body) = &self.body {
            write!(f, " {}", body)?;
        }

        write!(f, ")")
    }
}
