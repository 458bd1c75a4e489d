use crate::{
    ast::expressions::Expr,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::{BindingPower, InfixParselet},
    parser::{Parser, MAX_NESTING},
};

pub fn parse_expr(parser: &mut Parser, min_bp: u8) -> Result<Expr, Diagnostic> {
    parser.enter_nested()?;
    let expr = parse_nested_expr(parser, min_bp);
    parser.leave_nested();

    expr
}

fn too_tall(parser: &Parser, expr: &Expr) -> Result<(), Diagnostic> {
    if expr.height > MAX_NESTING {
        return Err(parser.error(DiagnosticKind::NestingTooDeep { limit: MAX_NESTING }));
    }

    Ok(())
}

fn parse_nested_expr(parser: &mut Parser, min_bp: u8) -> Result<Expr, Diagnostic> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(prefix) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.error(DiagnosticKind::ExpectedExpression {
            found: parser.current_token().lexeme.clone(),
        }));
    };

    let mut left = (prefix.handler)(parser, prefix.binding_power)?;
    too_tall(parser, &left)?;

    // Fold postfix and infix operators while they bind at least as tightly as min_bp
    loop {
        let token_kind = parser.current_token_kind();

        if let Some(postfix) = parser.get_postfix_lookup().get(&token_kind).copied() {
            if postfix.binding_power.level() < min_bp {
                break;
            }
            left = (postfix.handler)(parser, left)?;
            too_tall(parser, &left)?;
            continue;
        }

        if let Some(infix) = parser.get_led_lookup().get(&token_kind).copied() {
            if infix.binding_power.level() < min_bp {
                break;
            }
            left = (infix.handler)(parser, left, infix)?;
            too_tall(parser, &left)?;
            continue;
        }

        break;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::Identifier => Ok(Expr::identifier(token)),
        kind if kind.is_literal() => Ok(Expr::literal(token)),
        _ => Err(parser.error(DiagnosticKind::UnexpectedToken {
            token: token.lexeme,
        })),
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    parselet: InfixParselet,
) -> Result<Expr, Diagnostic> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, parselet.right_binding_power())?;

    Ok(Expr::binary(operator_token, left, right))
}

pub fn parse_prefix_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, bp.level())?;

    Ok(Expr::unary(operator_token, operand))
}

pub fn parse_grouping_expr(parser: &mut Parser, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default.level())?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Comma separated expressions up to and including `close`.
fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Diagnostic> {
    let mut items = vec![];

    if parser.current_token_kind() == close {
        parser.advance();
        return Ok(items);
    }

    loop {
        items.push(parse_expr(parser, BindingPower::Default.level())?);

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
            }
            kind if kind == close => {
                parser.advance();
                return Ok(items);
            }
            _ => {
                return Err(parser.error(DiagnosticKind::ExpectedToken {
                    expected: close,
                    found: parser.current_token().lexeme.clone(),
                }))
            }
        }
    }
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Diagnostic> {
    parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::call(left, arguments))
}

pub fn parse_indexed_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Diagnostic> {
    parser.advance();

    if parser.current_token_kind() == TokenKind::CloseBracket {
        return Err(parser.error(DiagnosticKind::ExpectedExpression {
            found: parser.current_token().lexeme.clone(),
        }));
    }

    let indices = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::indexed(left, indices))
}
