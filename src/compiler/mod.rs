//! Code generation module for the compiler.
//!
//! This module lowers the typed AST into LLVM IR. The whole program becomes a
//! single `main` function; reads and writes go through two external runtime
//! procedures declared in [`runtime`].

pub mod compiler;
pub mod expr;
pub mod runtime;
pub mod stmt;
