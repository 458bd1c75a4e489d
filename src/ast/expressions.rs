use std::fmt::Display;

use serde::Serialize;

use crate::lexer::tokens::Token;

use super::types::Type;

/// An expression node. `inferred_type` starts as `Unknown` and is set by
/// the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub inferred_type: Type,
    pub line: u32,
    /// Nodes on the longest path down to a leaf, this one included.
    #[serde(skip)]
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Literal(Token),
    Identifier(Token),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Indexed(IndexedExpr),
}

/// Prefix operator applied to one operand, e.g. `-x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub operator: Token,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub operator: Token,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// `base[i, j, ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedExpr {
    pub base: Box<Expr>,
    pub indices: Vec<Expr>,
}

impl Expr {
    fn new(kind: ExprKind, line: u32) -> Expr {
        let below = match &kind {
            ExprKind::Literal(_) | ExprKind::Identifier(_) => 0,
            ExprKind::Unary(unary) => unary.operand.height,
            ExprKind::Binary(binary) => binary.left.height.max(binary.right.height),
            ExprKind::Call(call) => tallest(&call.callee, &call.arguments),
            ExprKind::Indexed(indexed) => tallest(&indexed.base, &indexed.indices),
        };

        Expr {
            kind,
            inferred_type: Type::Unknown,
            line,
            height: below + 1,
        }
    }

    pub fn literal(token: Token) -> Expr {
        let line = token.line;
        Expr::new(ExprKind::Literal(token), line)
    }

    pub fn identifier(token: Token) -> Expr {
        let line = token.line;
        Expr::new(ExprKind::Identifier(token), line)
    }

    pub fn unary(operator: Token, operand: Expr) -> Expr {
        let line = operator.line;
        Expr::new(
            ExprKind::Unary(UnaryExpr {
                operator,
                operand: Box::new(operand),
            }),
            line,
        )
    }

    pub fn binary(operator: Token, left: Expr, right: Expr) -> Expr {
        let line = left.line;
        Expr::new(
            ExprKind::Binary(BinaryExpr {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
            line,
        )
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
        let line = callee.line;
        Expr::new(
            ExprKind::Call(CallExpr {
                callee: Box::new(callee),
                arguments,
            }),
            line,
        )
    }

    pub fn indexed(base: Expr, indices: Vec<Expr>) -> Expr {
        let line = base.line;
        Expr::new(
            ExprKind::Indexed(IndexedExpr {
                base: Box::new(base),
                indices,
            }),
            line,
        )
    }
}

fn tallest(first: &Expr, rest: &[Expr]) -> usize {
    rest.iter().map(|e| e.height).fold(first.height, usize::max)
}

fn write_list(f: &mut std::fmt::Formatter<'_>, items: &[Expr]) -> std::fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

/// Prints the expression as an S-expression: `1 + 2 * 3` is `(+ 1 (* 2 3))`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Literal(token) => write!(f, "{}", token.lexeme),
            ExprKind::Identifier(token) => write!(f, "{}", token.name()),
            ExprKind::Unary(unary) => write!(f, "({} {})", unary.operator.lexeme, unary.operand),
            ExprKind::Binary(binary) => write!(
                f,
                "({} {} {})",
                binary.operator.lexeme, binary.left, binary.right
            ),
            ExprKind::Call(call) => {
                write!(f, "(call {}", call.callee)?;
                write_list(f, &call.arguments)?;
                write!(f, ")")
            }
            ExprKind::Indexed(indexed) => {
                write!(f, "(index {}", indexed.base)?;
                write_list(f, &indexed.indices)?;
                write!(f, ")")
            }
        }
    }
}
