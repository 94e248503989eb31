use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{
        ast::{BindingKind, Block, Program},
        expressions::{Expr, ExprKind},
        statements::{ForStmt, Stmt, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::symbols::{Definition, SymbolId, SymbolTable};

/// Names visible in one lexical block.
#[derive(Debug, Default)]
pub struct Scope {
    pub names: HashMap<String, SymbolId>,
}

#[derive(Debug, Default)]
pub struct Resolver {
    pub scopes: Vec<Scope>,
    pub symbols: SymbolTable,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Searches the scope stack from the innermost scope outwards.
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name).copied())
    }

    /// Returns the symbol bound to `name` in the current scope, creating it if needed.
    pub fn add_or_get_symbol(&mut self, name: &str, definition: Definition) -> SymbolId {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        let depth = self.scopes.len();
        let scope = &mut self.scopes[depth - 1];

        if let Some(symbol) = scope.names.get(name) {
            return *symbol;
        }

        let symbol = self.symbols.add(name, definition);
        scope.names.insert(String::from(name), symbol);
        debug!("declared `{}` as {:?} at scope depth {}", name, symbol, depth);
        symbol
    }
}

fn resolve_expr(resolver: &mut Resolver, expr: &mut Expr) -> Result<(), Error> {
    match &mut expr.kind {
        ExprKind::IntLit(_) | ExprKind::Input => Ok(()),
        ExprKind::Id { name, symbol } => match resolver.find_symbol(name) {
            Some(found) => {
                *symbol = Some(found);
                Ok(())
            }
            None => Err(Error::new(ErrorImpl::UnresolvedName { name: name.clone() })),
        },
        ExprKind::Unary { operand, .. } => resolve_expr(resolver, operand),
        ExprKind::Binary { left, right, .. } => {
            resolve_expr(resolver, left)?;
            resolve_expr(resolver, right)
        }
        ExprKind::Conversion(inner) | ExprKind::LValToRVal(inner) => resolve_expr(resolver, inner),
        ExprKind::Glue(fields) => {
            for field in fields.iter_mut() {
                resolve_expr(resolver, &mut field.value)?;
            }
            Ok(())
        }
        ExprKind::Dot { base, .. } | ExprKind::Index { base, .. } => resolve_expr(resolver, base),
    }
}

fn resolve_var_decl(resolver: &mut Resolver, var_decl: &mut VarDeclStmt) -> Result<(), Error> {
    if let Some(value) = var_decl.assigned_value.as_mut() {
        resolve_expr(resolver, value)?;
    }

    let symbol = match var_decl.kind {
        BindingKind::Declaration => {
            resolver.add_or_get_symbol(&var_decl.identifier, Definition::Declaration)
        }
        BindingKind::Assignment => match resolver.find_symbol(&var_decl.identifier) {
            Some(symbol) => symbol,
            None => resolver.add_or_get_symbol(&var_decl.identifier, Definition::Assignment),
        },
    };

    var_decl.symbol = Some(symbol);
    Ok(())
}

fn resolve_for(resolver: &mut Resolver, for_stmt: &mut ForStmt) -> Result<(), Error> {
    resolver.push_scope();

    for bound in for_stmt.bounds.iter_mut() {
        resolve_expr(resolver, bound)?;
    }
    for_stmt.symbol = Some(resolver.add_or_get_symbol(&for_stmt.variable, Definition::LoopVariable));
    resolve_block(resolver, &mut for_stmt.body)?;

    resolver.pop_scope();
    Ok(())
}

pub fn resolve_stmt(resolver: &mut Resolver, stmt: &mut Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(var_decl) => resolve_var_decl(resolver, var_decl),
        Stmt::Print(print) => resolve_expr(resolver, &mut print.value),
        Stmt::Expression(expression) => resolve_expr(resolver, &mut expression.expression),
        Stmt::If(if_stmt) => {
            resolve_expr(resolver, &mut if_stmt.condition)?;
            resolve_block(resolver, &mut if_stmt.then_body)?;
            if let Some(else_body) = if_stmt.else_body.as_mut() {
                resolve_block(resolver, else_body)?;
            }
            Ok(())
        }
        Stmt::While(while_stmt) => {
            resolve_expr(resolver, &mut while_stmt.condition)?;
            resolve_block(resolver, &mut while_stmt.body)
        }
        Stmt::For(for_stmt) => resolve_for(resolver, for_stmt),
        Stmt::Block(block) => resolve_block(resolver, block),
    }
}

pub fn resolve_block(resolver: &mut Resolver, block: &mut Block) -> Result<(), Error> {
    resolver.push_scope();
    for stmt in block.body.iter_mut() {
        resolve_stmt(resolver, stmt)?;
    }
    resolver.pop_scope();
    Ok(())
}

/// Binds every identifier in the program to a symbol.
///
/// Takes the program by value and hands it back with symbol handles attached,
/// together with the arena that owns the symbols.
pub fn resolve(mut program: Program) -> Result<(Program, SymbolTable), Error> {
    let mut resolver = Resolver::new();

    resolver.push_scope();
    for stmt in program.body.iter_mut() {
        resolve_stmt(&mut resolver, stmt)?;
    }
    resolver.pop_scope();

    debug!("resolved {} symbols", resolver.symbols.len());
    Ok((program, resolver.symbols))
}
