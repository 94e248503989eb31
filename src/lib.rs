#![allow(clippy::module_inception)]

//! A compiler for a small imperative language with arbitrary-width integers,
//! booleans and anonymous structs.
//!
//! The pipeline is: [`lexer`] -> [`parser`] -> [`resolver`] ->
//! [`type_checker`] -> [`compiler`], which emits a single LLVM function
//! `main` calling an external runtime for integer I/O.

use std::time::Instant;

use inkwell::context::Context;
use log::info;

use crate::{
    ast::ast::Program,
    compiler::compiler::{compile, Compiler},
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    resolver::resolver::resolve,
    type_checker::type_checker::{type_check, TypeChecker},
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod type_checker;
pub mod types;

/// Parses source text into an untyped program.
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let start = Instant::now();
    let tokens = tokenize(source.to_string())?;
    info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let program = parse(tokens)?;
    info!("Parsed in {:?}", parse_start.elapsed());

    Ok(program)
}

/// Runs every stage up to and including type checking.
pub fn check_source(source: &str) -> Result<(Program, TypeChecker), Error> {
    let program = parse_source(source)?;

    let resolve_start = Instant::now();
    let (program, symbols) = resolve(program)?;
    info!("Resolved {} symbols in {:?}", symbols.len(), resolve_start.elapsed());

    let type_check_start = Instant::now();
    let checked = type_check(program, symbols)?;
    info!("Type checked in {:?}", type_check_start.elapsed());

    Ok(checked)
}

/// Compiles source text into a verified LLVM module owned by `context`.
pub fn compile_source<'a>(
    source: &str,
    module_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, Error> {
    let start = Instant::now();
    let (program, type_checker) = check_source(source)?;

    let compile_start = Instant::now();
    let compiled = compile(program, type_checker, module_name, context)?;
    info!("Compiled in {:?}", compile_start.elapsed());
    info!("Total time for IR generation: {:?}", start.elapsed());

    Ok(compiled)
}
