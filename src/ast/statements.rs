use crate::resolver::symbols::SymbolId;

use super::{
    ast::{BindingKind, Block, TypeSpec},
    expressions::Expr,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Print(PrintStmt),
    Expression(ExpressionStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Block(Block),
}

/// Declaration or assignment of a named variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub kind: BindingKind,
    pub explicit_type: Option<TypeSpec>,
    pub assigned_value: Option<Expr>,
    pub symbol: Option<SymbolId>,
}

impl VarDeclStmt {
    pub fn declaration(identifier: &str, explicit_type: Option<TypeSpec>, value: Option<Expr>) -> Stmt {
        Stmt::VarDecl(VarDeclStmt {
            identifier: String::from(identifier),
            kind: BindingKind::Declaration,
            explicit_type,
            assigned_value: value,
            symbol: None,
        })
    }

    pub fn assignment(identifier: &str, value: Expr) -> Stmt {
        Stmt::VarDecl(VarDeclStmt {
            identifier: String::from(identifier),
            kind: BindingKind::Assignment,
            explicit_type: None,
            assigned_value: Some(value),
            symbol: None,
        })
    }
}

/// `output(0, value)`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Block,
    pub else_body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
}

/// `for (variable in lower : upper) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub variable: String,
    pub symbol: Option<SymbolId>,
    pub bounds: Vec<Expr>,
    pub body: Block,
}
