use std::fmt::Display;

use super::statements::Stmt;

/// Root of a translation unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }
}

/// A braced list of statements, opening its own scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub body: Vec<Stmt>,
}

impl Block {
    pub fn new(body: Vec<Stmt>) -> Self {
        Block { body }
    }
}

/// A written type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Int(u32),
    Bool,
}

impl Display for TypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSpec::Int(width) => write!(f, "int({})", width),
            TypeSpec::Bool => write!(f, "bool"),
        }
    }
}

/// How a binding statement introduces its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `x : T = e`, binds in the current scope
    Declaration,
    /// `x = e`, writes the nearest visible `x` or declares one
    Assignment,
}
