//! Indented tree printer for the AST.
//!
//! Produces one line per node. When a [`TypeUniverse`] is supplied, every
//! typed expression is suffixed with its type, which makes the rewrites done
//! by the type checker (conversions, loads, resolved literals) visible.

use crate::types::types::TypeUniverse;

use super::{
    ast::{BindingKind, Block, Program},
    expressions::{Expr, ExprKind},
    statements::Stmt,
};

struct Dumper<'t> {
    output: String,
    indent_level: usize,
    types: Option<&'t TypeUniverse>,
}

impl<'t> Dumper<'t> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str("  |");
        }
        if self.indent_level > 0 {
            self.output.push_str("-- ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent_level += 1;
        f(self);
        self.indent_level -= 1;
    }

    fn block(&mut self, label: &str, block: &Block) {
        self.line(label);
        self.nested(|dumper| {
            for stmt in block.body.iter() {
                dumper.stmt(stmt);
            }
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(var_decl) => {
                let label = match var_decl.kind {
                    BindingKind::Declaration => "Declaration",
                    BindingKind::Assignment => "Assignment",
                };
                self.line(&format!("{} [Name: {}]", label, var_decl.identifier));
                self.nested(|dumper| {
                    if let Some(explicit_type) = &var_decl.explicit_type {
                        dumper.line(&format!("TypeSpec [{}]", explicit_type));
                    }
                    if let Some(value) = &var_decl.assigned_value {
                        dumper.expr(value);
                    }
                });
            }
            Stmt::Print(print) => {
                self.line("Output");
                self.nested(|dumper| dumper.expr(&print.value));
            }
            Stmt::Expression(expression) => {
                self.line("ExprStmt");
                self.nested(|dumper| dumper.expr(&expression.expression));
            }
            Stmt::If(if_stmt) => {
                self.line("If");
                self.nested(|dumper| {
                    dumper.expr(&if_stmt.condition);
                    dumper.block("Then", &if_stmt.then_body);
                    if let Some(else_body) = &if_stmt.else_body {
                        dumper.block("Else", else_body);
                    }
                });
            }
            Stmt::While(while_stmt) => {
                self.line("While");
                self.nested(|dumper| {
                    dumper.expr(&while_stmt.condition);
                    dumper.block("Body", &while_stmt.body);
                });
            }
            Stmt::For(for_stmt) => {
                self.line(&format!("For [Var: {}]", for_stmt.variable));
                self.nested(|dumper| {
                    for bound in for_stmt.bounds.iter() {
                        dumper.expr(bound);
                    }
                    dumper.block("Body", &for_stmt.body);
                });
            }
            Stmt::Block(block) => self.block("Block", block),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        let label = match &expr.kind {
            ExprKind::IntLit(value) => format!("IntLit [{}]", value),
            ExprKind::Id { name, .. } => format!("Id [{}]", name),
            ExprKind::Input => String::from("InputExpr"),
            ExprKind::Unary { operator, .. } => format!("UnaryExpr [{}]", operator),
            ExprKind::Binary { operator, .. } => format!("BinExpr [{}]", operator),
            ExprKind::Conversion(_) => String::from("Conversion"),
            ExprKind::LValToRVal(_) => String::from("LValToRVal"),
            ExprKind::Glue(_) => String::from("Glue"),
            ExprKind::Dot { field, .. } => format!("DotExpr [{}]", field),
            ExprKind::Index { index, .. } => format!("IndexExpr [{}]", index),
        };

        match (expr.ty, self.types) {
            (Some(ty), Some(types)) => self.line(&format!("{} : {}", label, types.describe(ty))),
            _ => self.line(&label),
        }

        self.nested(|dumper| match &expr.kind {
            ExprKind::IntLit(_) | ExprKind::Id { .. } | ExprKind::Input => {}
            ExprKind::Unary { operand, .. } => dumper.expr(operand),
            ExprKind::Binary { left, right, .. } => {
                dumper.expr(left);
                dumper.expr(right);
            }
            ExprKind::Conversion(inner) | ExprKind::LValToRVal(inner) => dumper.expr(inner),
            ExprKind::Glue(fields) => {
                for field in fields.iter() {
                    match &field.name {
                        Some(name) => {
                            dumper.line(&format!("Field [{}]", name));
                            dumper.nested(|dumper| dumper.expr(&field.value));
                        }
                        None => dumper.expr(&field.value),
                    }
                }
            }
            ExprKind::Dot { base, .. } | ExprKind::Index { base, .. } => dumper.expr(base),
        });
    }
}

/// Renders the program as an indented tree, one node per line.
pub fn dump_program(program: &Program, types: Option<&TypeUniverse>) -> String {
    let mut dumper = Dumper {
        output: String::new(),
        indent_level: 0,
        types,
    };

    dumper.line("Program");
    dumper.nested(|dumper| {
        for stmt in program.body.iter() {
            dumper.stmt(stmt);
        }
    });

    dumper.output
}
