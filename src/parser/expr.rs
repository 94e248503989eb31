//! Expression parsing.
//!
//! Prefix handlers (NUD) start an expression from the current token; infix
//! and postfix handlers (LED) extend an already parsed left-hand side.
//! `parse_expr` drives both according to binding power.

use crate::{
    ast::expressions::{Expr, GlueField},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses an expression whose operators all bind tighter than `bp`.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let nud_fn = match parser.get_nud_handler(parser.current_token_kind()) {
        Some(handler) => handler,
        None => return Err(parser.syntax_error("expected expression")),
    };

    let mut left = nud_fn(parser)?;

    while parser.get_binding_power(parser.current_token_kind()) > bp {
        let led_fn = match parser.get_led_handler(parser.current_token_kind()) {
            Some(handler) => handler,
            None => break,
        };
        let operator_bp = parser.get_binding_power(parser.current_token_kind());

        left = led_fn(parser, left, operator_bp)?;
    }

    Ok(left)
}

fn parse_number(token: &Token) -> Result<u64, Error> {
    token.value.parse::<u64>().map_err(|_| {
        Error::new(ErrorImpl::NumberParseError {
            token: token.value.clone(),
        })
    })
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance();
            Ok(Expr::int(parse_number(&token)?))
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(Expr::id(&token.value))
        }
        _ => Err(parser.syntax_error("expected literal or identifier")),
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = parser.advance();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::unary(&operator.value, operand))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = parser.advance();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::binary(&operator.value, left, right))
}

/// `base.name` or `base.N`
pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dot)?;

    match parser.current_token_kind() {
        TokenKind::Identifier => {
            let field = parser.advance();
            Ok(Expr::dot(left, &field.value))
        }
        TokenKind::Number => {
            let token = parser.advance();
            let index = usize::try_from(parse_number(&token)?).map_err(|_| {
                Error::new(ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                })
            })?;
            Ok(Expr::index(left, index))
        }
        _ => Err(parser.syntax_error("expected field name or index")),
    }
}

/// `input(0)`
pub fn parse_input_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::Input)?;
    parser.expect(TokenKind::OpenParen)?;
    expect_stream(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::input())
}

/// Consumes the stream selector of `input`/`output`; only stream `0` exists.
pub fn expect_stream(parser: &mut Parser) -> Result<(), Error> {
    if parser.current_token_kind() != TokenKind::Number {
        return Err(parser.syntax_error("expected stream number"));
    }
    if parse_number(parser.current_token())? != 0 {
        return Err(parser.syntax_error("only stream 0 is supported"));
    }

    parser.advance();
    Ok(())
}

fn starts_named_field(parser: &Parser) -> bool {
    parser.current_token_kind() == TokenKind::Identifier && parser.peek_kind(1) == TokenKind::Colon
}

fn parse_glue_field(parser: &mut Parser) -> Result<GlueField, Error> {
    if starts_named_field(parser) {
        let name = parser.advance();
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;
        return Ok(GlueField::named(&name.value, value));
    }

    Ok(GlueField::positional(parse_expr(parser, BindingPower::Default)?))
}

/// A parenthesised expression or a struct literal.
///
/// The parentheses hold a struct literal when they contain a comma or a
/// named field, so `(a)` is grouping while `(a,)` and `(x: a)` are glue.
pub fn parse_paren_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let named = starts_named_field(parser);
    let first = parse_glue_field(parser)?;

    if !named && parser.current_token_kind() != TokenKind::Comma {
        parser.expect(TokenKind::CloseParen)?;
        return Ok(first.value);
    }

    let mut fields = vec![first];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        if parser.current_token_kind() == TokenKind::CloseParen {
            break;
        }
        fields.push(parse_glue_field(parser)?);
    }
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::glue(fields))
}
