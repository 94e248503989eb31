//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program). It uses a Pratt parser for
//! expressions with binding powers for precedence and handles:
//!
//! - Statement parsing (declarations, assignments, output, control flow)
//! - Expression parsing (binary and unary operators, struct literals, member access)
//! - Type annotations (`int`, `int(N)`, `bool`)
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing. The first syntax error aborts parsing.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
