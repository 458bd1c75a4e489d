use crate::{
    ast::statements::{BlockStmt, ExpressionStmt, FnDeclStmt, Parameter, ReturnStmt, Stmt},
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default.level())?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        line: expression.line,
        expression,
    }))
}

/// `func name(a i64, b i64) i64 { ... }` or a forward declaration ending in `;`.
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let line = parser.advance().line;
    let name = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let name = parser.expect(TokenKind::Identifier)?;
            let ty = parse_type(parser)?;
            parameters.push(Parameter { name, ty });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser
        .get_type_nud_lookup()
        .contains_key(&parser.current_token_kind())
    {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = if parser.current_token_kind() == TokenKind::OpenCurly {
        Some(parse_block(parser)?)
    } else {
        parser.expect(TokenKind::Semicolon)?;
        None
    };

    Ok(Stmt::FunctionDeclaration(FnDeclStmt {
        name,
        parameters,
        return_type,
        body,
        line,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let line = parser.advance().line;

    let value = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default.level())?)
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt { value, line }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// A failed statement inside the block is recorded and skipped, so the rest
/// of the block still parses.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Diagnostic> {
    parser.enter_nested()?;
    let block = parse_nested_block(parser);
    parser.leave_nested();

    block
}

fn parse_nested_block(parser: &mut Parser) -> Result<BlockStmt, Diagnostic> {
    let line = parser.expect(TokenKind::OpenCurly)?.line;

    let mut body = vec![];

    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        let started_at = parser.cursor();

        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(diagnostic) => parser.recover(
                diagnostic,
                &[TokenKind::CloseCurly, TokenKind::Func],
                started_at,
            ),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt { body, line })
}
