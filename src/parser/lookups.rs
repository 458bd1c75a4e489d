use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default = 0,
    Relational = 10,
    Additive = 20,
    Multiplicative = 30,
    Unary = 40,
    Dereference = 50,
    Postfix = 60,
}

impl BindingPower {
    pub fn level(self) -> u8 {
        self as u8
    }
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Associativity {
    Left,
    Right,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Diagnostic>;
pub type NUDHandler = fn(&mut Parser, BindingPower) -> Result<Expr, Diagnostic>;
pub type LEDHandler = fn(&mut Parser, Expr, InfixParselet) -> Result<Expr, Diagnostic>;
pub type PostfixHandler = fn(&mut Parser, Expr) -> Result<Expr, Diagnostic>;

/// Prefix entry. `binding_power` is the minimum the operand is parsed at.
#[derive(Clone, Copy)]
pub struct PrefixParselet {
    pub binding_power: BindingPower,
    pub handler: NUDHandler,
}

#[derive(Clone, Copy)]
pub struct InfixParselet {
    pub binding_power: BindingPower,
    pub associativity: Associativity,
    pub handler: LEDHandler,
}

impl InfixParselet {
    /// Binding power the right operand is parsed at. Left associative
    /// operators bind their right side one level tighter.
    pub fn right_binding_power(&self) -> u8 {
        match self.associativity {
            Associativity::Left => self.binding_power.level() + 1,
            Associativity::Right => self.binding_power.level(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct PostfixParselet {
    pub binding_power: BindingPower,
    pub handler: PostfixHandler,
}

pub fn create_token_lookups(parser: &mut Parser) {
    // Relational
    parser.led(TokenKind::Equals, BindingPower::Relational, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, Associativity::Left, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, Associativity::Left, parse_binary_expr);

    // Call and index
    parser.postfix(TokenKind::OpenParen, BindingPower::Postfix, parse_call_expr);
    parser.postfix(TokenKind::OpenBracket, BindingPower::Postfix, parse_indexed_expr);

    // Literals and symbols
    for kind in [
        TokenKind::I8,
        TokenKind::I16,
        TokenKind::I32,
        TokenKind::I64,
        TokenKind::U8,
        TokenKind::U16,
        TokenKind::U32,
        TokenKind::U64,
        TokenKind::F32,
        TokenKind::F64,
        TokenKind::Char,
        TokenKind::String,
        TokenKind::Identifier,
    ] {
        parser.nud(kind, BindingPower::Default, parse_primary_expr);
    }
    parser.nud(TokenKind::OpenParen, BindingPower::Default, parse_grouping_expr);

    // Prefix operators
    parser.nud(TokenKind::Plus, BindingPower::Unary, parse_prefix_expr);
    parser.nud(TokenKind::Dash, BindingPower::Unary, parse_prefix_expr);
    parser.nud(TokenKind::Star, BindingPower::Dereference, parse_prefix_expr);

    // Statements
    parser.stmt(TokenKind::Func, parse_fn_decl_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, PrefixParselet>;
pub type LEDLookup = HashMap<TokenKind, InfixParselet>;
pub type PostfixLookup = HashMap<TokenKind, PostfixParselet>;
