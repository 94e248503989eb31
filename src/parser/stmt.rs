//! Statement parsing.
//!
//! Each statement kind is selected by its leading token through the
//! statement lookup table. Anything else is parsed as an expression
//! followed by `;`.

use crate::{
    ast::{
        ast::Block,
        expressions::Expr,
        statements::{ExpressionStmt, ForStmt, IfStmt, PrintStmt, Stmt, VarDeclStmt, WhileStmt},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::{expect_stream, parse_expr},
    lookups::BindingPower,
    parser::Parser,
    types::{at_type, parse_type},
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser.get_stmt_handler(parser.current_token_kind()) {
        return stmt_fn(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt { expression }))
}

/// `{ stmt* }`
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    while !parser
        .current_token()
        .is_one_of(&[TokenKind::CloseCurly, TokenKind::EOF])
    {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(Block::new(body))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// Declaration (`x : T = e`, `x : T`, `x : = e`), assignment (`x = e`) or
/// an expression statement starting with a name.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    match parser.peek_kind(1) {
        TokenKind::Colon => parse_declaration_stmt(parser),
        TokenKind::Assignment => {
            let identifier = parser.advance();
            parser.expect(TokenKind::Assignment)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;

            Ok(VarDeclStmt::assignment(&identifier.value, value))
        }
        _ => parse_expression_stmt(parser),
    }
}

fn parse_declaration_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let identifier = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;

    let explicit_type = if at_type(parser) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    if explicit_type.is_none() && value.is_none() {
        return Err(parser.syntax_error("expected type or initializer"));
    }

    parser.expect(TokenKind::Semicolon)?;
    Ok(VarDeclStmt::declaration(&identifier.value, explicit_type, value))
}

/// `output(0, e);`
pub fn parse_output_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Output)?;
    parser.expect(TokenKind::OpenParen)?;
    expect_stream(parser)?;
    parser.expect(TokenKind::Comma)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Print(PrintStmt { value }))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

/// `if (c) { .. }` with an optional `else { .. }` or `else if ..`.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::If)?;
    let condition = parse_condition(parser)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(Block::new(vec![parse_if_stmt(parser)?]))
        } else {
            Some(parse_block(parser)?)
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::While)?;
    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt { condition, body }))
}

/// `for (i in a : b) { .. }`; any number of `:`-separated bounds is accepted here.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::For)?;
    parser.expect(TokenKind::OpenParen)?;
    let variable = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::In)?;

    let mut bounds = vec![parse_expr(parser, BindingPower::Default)?];
    while parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        bounds.push(parse_expr(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::CloseParen)?;
    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        variable: variable.value,
        symbol: None,
        bounds,
        body,
    }))
}
