//! Type annotation parsing.
//!
//! Annotations are `int`, `int(N)` or `bool`. Handlers are looked up by the
//! leading keyword the same way expression prefixes are.

use std::collections::HashMap;

use crate::{
    ast::ast::TypeSpec,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    types::types::DEFAULT_INT_WIDTH,
};

use super::parser::Parser;

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeSpec, Error>;
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_int_type);
    parser.type_nud(TokenKind::Bool, parse_bool_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeSpec, Error> {
    match parser.get_type_nud_handler(parser.current_token_kind()) {
        Some(handler) => handler(parser),
        None => Err(parser.syntax_error("expected type")),
    }
}

/// Whether the current token can start a type annotation.
pub fn at_type(parser: &Parser) -> bool {
    parser
        .get_type_nud_handler(parser.current_token_kind())
        .is_some()
}

pub fn parse_int_type(parser: &mut Parser) -> Result<TypeSpec, Error> {
    parser.expect(TokenKind::Int)?;

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(TypeSpec::Int(DEFAULT_INT_WIDTH));
    }

    parser.advance();
    let width = parser.expect(TokenKind::Number)?;
    let width = width
        .value
        .parse::<u32>()
        .map_err(|_| Error::new(ErrorImpl::NumberParseError { token: width.value.clone() }))?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(TypeSpec::Int(width))
}

pub fn parse_bool_type(parser: &mut Parser) -> Result<TypeSpec, Error> {
    parser.expect(TokenKind::Bool)?;
    Ok(TypeSpec::Bool)
}
