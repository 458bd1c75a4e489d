//! Type parsing implementation.
//!
//! A type annotation is a single identifier. It is kept as `Type::Named`
//! here; the analyzer decides whether the name is a builtin.
//!
//! Like expressions, types are parsed through a lookup table keyed by the
//! token kind that starts them.

use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Diagnostic>;

/// Type alias for type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Diagnostic> {
    let Some(handler) = parser
        .get_type_nud_lookup()
        .get(&parser.current_token_kind())
        .copied()
    else {
        return Err(parser.error(DiagnosticKind::InvalidType {
            found: parser.current_token().lexeme.clone(),
        }));
    };

    handler(parser)
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Diagnostic> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Type::Named(token))
}
