use std::collections::BTreeMap;

use log::debug;

use crate::{
    ast::{
        ast::{Block, Program, TypeSpec},
        expressions::{Expr, ExprKind, GlueField, OperatorClass},
        statements::{
            ExpressionStmt, ForStmt, IfStmt, PrintStmt, Stmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    resolver::symbols::SymbolTable,
    types::types::{Promotion, Type, TypeId, TypeUniverse},
};

/// State shared by every step of type checking.
///
/// After checking, this owns the two arenas the emitter needs: the types
/// every node points at and the symbols every storage node points at.
#[derive(Debug)]
pub struct TypeChecker {
    pub types: TypeUniverse,
    pub symbols: SymbolTable,
}

impl TypeChecker {
    pub fn new(symbols: SymbolTable) -> Self {
        TypeChecker {
            types: TypeUniverse::new(),
            symbols,
        }
    }

    fn mismatch(&self, expected: TypeId, received: TypeId) -> Error {
        Error::new(ErrorImpl::TypeMismatch {
            expected: self.types.describe(expected),
            received: self.types.describe(received),
        })
    }

    fn expected_int(&self, received: TypeId) -> Error {
        Error::new(ErrorImpl::TypeMismatch {
            expected: String::from("int"),
            received: self.types.describe(received),
        })
    }

    fn resolve_type_spec(&mut self, type_spec: TypeSpec) -> Result<TypeId, Error> {
        match type_spec {
            TypeSpec::Int(0) => Err(Error::new(ErrorImpl::InvalidWidth { width: 0 })),
            TypeSpec::Int(width) => Ok(self.types.get_int(width)),
            TypeSpec::Bool => Ok(self.types.get_bool()),
        }
    }
}

pub fn type_of(expr: &Expr) -> Result<TypeId, Error> {
    expr.ty.ok_or_else(|| {
        Error::new(ErrorImpl::LoweringError {
            message: String::from("expression has not been type checked"),
        })
    })
}

/// Wraps a storage-denoting expression in a load of the same type.
pub fn materialize(expr: Expr) -> Result<Expr, Error> {
    if !expr.denotes_storage() {
        return Ok(expr);
    }

    let ty = type_of(&expr)?;
    Ok(Expr {
        kind: ExprKind::LValToRVal(Box::new(expr)),
        ty: Some(ty),
    })
}

fn wrap_conversion(type_checker: &TypeChecker, expr: Expr, target: TypeId) -> Expr {
    if let Some(from) = expr.ty {
        debug!(
            "inserted conversion {} -> {}",
            type_checker.types.describe(from),
            type_checker.types.describe(target)
        );
    }

    Expr {
        kind: ExprKind::Conversion(Box::new(expr)),
        ty: Some(target),
    }
}

/// Makes `expr` produce a value of type `target`.
///
/// Flexible expressions take the target type in place and are re-checked so the
/// demand reaches their leaves. Everything else is wrapped in an explicit
/// conversion node when the conversion is legal.
pub fn convert_to(type_checker: &mut TypeChecker, expr: Expr, target: TypeId) -> Result<Expr, Error> {
    let mut expr = materialize(expr)?;
    let current = type_of(&expr)?;

    if current == target || type_checker.types.is_flexible(target) {
        return Ok(expr);
    }

    if type_checker.types.is_bool(target) {
        if type_checker.types.is_flexible(current) {
            expr.ty = Some(type_checker.types.get_default_int());
            expr = type_check_expr(type_checker, expr)?;
        }

        let current = type_of(&expr)?;
        return match type_checker.types.get(current) {
            Type::Int(_) => Ok(wrap_conversion(type_checker, expr, target)),
            _ => Err(type_checker.mismatch(target, current)),
        };
    }

    if type_checker.types.is_flexible(current) {
        if type_checker.types.as_struct(target).is_some() {
            return Err(type_checker.mismatch(target, current));
        }
        expr.ty = Some(target);
        return type_check_expr(type_checker, expr);
    }

    let widening = match (type_checker.types.get(current), type_checker.types.get(target)) {
        (Type::Bool, Type::Int(_)) => true,
        (Type::Int(from), Type::Int(to)) => from < to,
        _ => false,
    };

    if widening {
        Ok(wrap_conversion(type_checker, expr, target))
    } else {
        Err(type_checker.mismatch(target, current))
    }
}

/// Whether `value`, negated when `negated` is set, lies in the signed range
/// of an integer `width` bits wide.
pub fn literal_fits(value: u64, width: u32, negated: bool) -> bool {
    if width == 0 {
        return false;
    }
    if width > 64 {
        return true;
    }

    let limit = 1u128 << (width - 1);
    let value = u128::from(value);
    if negated {
        value <= limit
    } else {
        value < limit
    }
}

fn check_literal_fits(type_checker: &TypeChecker, value: u64, ty: TypeId, negated: bool) -> Result<(), Error> {
    match type_checker.types.get(ty) {
        Type::Int(width) if !literal_fits(value, *width, negated) => {
            Err(Error::new(ErrorImpl::LiteralOutOfRange {
                value: if negated { format!("-{}", value) } else { value.to_string() },
                ty: type_checker.types.describe(ty),
            }))
        }
        Type::Int(_) | Type::Flexible => Ok(()),
        _ => Err(Error::new(ErrorImpl::TypeMismatch {
            expected: type_checker.types.describe(ty),
            received: String::from("int"),
        })),
    }
}

/// Types a literal directly under a unary minus, so `-2^(w-1)` is accepted.
fn type_check_negated_literal(
    type_checker: &mut TypeChecker,
    value: u64,
    ty: Option<TypeId>,
    demand: Option<TypeId>,
) -> Result<Expr, Error> {
    let ty = match demand.or(ty) {
        Some(ty) => ty,
        None => type_checker.types.get_flexible(),
    };
    check_literal_fits(type_checker, value, ty, true)?;

    Ok(Expr {
        kind: ExprKind::IntLit(value),
        ty: Some(ty),
    })
}

fn type_check_glue(type_checker: &mut TypeChecker, fields: Vec<GlueField>) -> Result<Expr, Error> {
    let mut checked = Vec::with_capacity(fields.len());
    let mut field_types = Vec::with_capacity(fields.len());
    let mut names = BTreeMap::new();

    for (position, field) in fields.into_iter().enumerate() {
        if let Some(name) = &field.name {
            if names.insert(name.clone(), position).is_some() {
                return Err(Error::new(ErrorImpl::DuplicateField { field: name.clone() }));
            }
        }

        let value = type_check_expr(type_checker, field.value)?;
        let value = if type_checker.types.is_flexible(type_of(&value)?) {
            let default_int = type_checker.types.get_default_int();
            convert_to(type_checker, value, default_int)?
        } else {
            materialize(value)?
        };

        field_types.push(type_of(&value)?);
        checked.push(GlueField {
            name: field.name,
            value,
        });
    }

    let ty = type_checker.types.get_struct(field_types, names);
    Ok(Expr {
        kind: ExprKind::Glue(checked),
        ty: Some(ty),
    })
}

fn type_check_binary(
    type_checker: &mut TypeChecker,
    operator: String,
    left: Expr,
    right: Expr,
    demand: Option<TypeId>,
) -> Result<Expr, Error> {
    let class = OperatorClass::of(&operator).ok_or_else(|| {
        Error::new(ErrorImpl::UnknownOperator {
            operator: operator.clone(),
        })
    })?;

    let left = type_check_expr(type_checker, left)?;
    let right = type_check_expr(type_checker, right)?;
    let left_type = type_of(&left)?;
    let right_type = type_of(&right)?;

    for operand in [left_type, right_type] {
        if type_checker.types.as_struct(operand).is_some() {
            return Err(type_checker.expected_int(operand));
        }
    }

    if let (Some(demand), OperatorClass::Arithmetic) = (demand, class) {
        let left = convert_to(type_checker, left, demand)?;
        let right = convert_to(type_checker, right, demand)?;
        return Ok(Expr {
            kind: ExprKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty: Some(demand),
        });
    }

    let both_flexible =
        type_checker.types.is_flexible(left_type) && type_checker.types.is_flexible(right_type);

    let common = match type_checker.types.common_type(left_type, right_type) {
        Promotion::Resolved(common) => common,
        Promotion::StillFlexible if class == OperatorClass::Arithmetic && both_flexible => {
            return Ok(Expr {
                kind: ExprKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                ty: Some(type_checker.types.get_flexible()),
            });
        }
        Promotion::StillFlexible => type_checker.types.get_default_int(),
        Promotion::Incompatible => return Err(type_checker.mismatch(left_type, right_type)),
    };

    let left = convert_to(type_checker, left, common)?;
    let right = convert_to(type_checker, right, common)?;

    let ty = match class {
        OperatorClass::Arithmetic => common,
        OperatorClass::Relational => type_checker.types.get_bool(),
    };

    Ok(Expr {
        kind: ExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty: Some(ty),
    })
}

/// Checks an expression and returns it rewritten.
///
/// A type already present on the node is a demand from the surrounding
/// expression, pushed down into flexible children. Checking an already
/// checked node yields the same node.
pub fn type_check_expr(type_checker: &mut TypeChecker, ast: Expr) -> Result<Expr, Error> {
    let demand = ast
        .ty
        .filter(|ty| !type_checker.types.is_flexible(*ty));

    match ast.kind {
        ExprKind::IntLit(value) => {
            let ty = match ast.ty {
                Some(ty) => ty,
                None => type_checker.types.get_flexible(),
            };
            check_literal_fits(type_checker, value, ty, false)?;

            Ok(Expr {
                kind: ExprKind::IntLit(value),
                ty: Some(ty),
            })
        }
        ExprKind::Input => {
            let ty = match ast.ty {
                Some(ty) => ty,
                None => type_checker.types.get_flexible(),
            };
            if !matches!(type_checker.types.get(ty), Type::Int(_) | Type::Flexible) {
                return Err(type_checker.expected_int(ty));
            }

            Ok(Expr {
                kind: ExprKind::Input,
                ty: Some(ty),
            })
        }
        ExprKind::Id { name, symbol } => {
            let symbol = symbol.ok_or_else(|| {
                Error::new(ErrorImpl::UnresolvedName { name: name.clone() })
            })?;
            let ty = type_checker
                .symbols
                .get_type(symbol)
                .ok_or_else(|| Error::new(ErrorImpl::UnboundSymbolType { name: name.clone() }))?;

            Ok(Expr {
                kind: ExprKind::Id {
                    name,
                    symbol: Some(symbol),
                },
                ty: Some(ty),
            })
        }
        ExprKind::Unary { operator, operand } => {
            if operator != "-" {
                return Err(Error::new(ErrorImpl::UnknownOperator { operator }));
            }

            let operand = match *operand {
                Expr {
                    kind: ExprKind::IntLit(value),
                    ty,
                } => type_check_negated_literal(type_checker, value, ty, demand)?,
                operand => type_check_expr(type_checker, operand)?,
            };
            let operand_type = type_of(&operand)?;
            if type_checker.types.as_struct(operand_type).is_some() {
                return Err(type_checker.expected_int(operand_type));
            }

            let (operand, ty) = match demand {
                Some(demand) if type_checker.types.is_flexible(operand_type) => {
                    (convert_to(type_checker, operand, demand)?, demand)
                }
                _ => (materialize(operand)?, operand_type),
            };

            Ok(Expr {
                kind: ExprKind::Unary {
                    operator,
                    operand: Box::new(operand),
                },
                ty: Some(ty),
            })
        }
        ExprKind::Binary {
            operator,
            left,
            right,
        } => type_check_binary(type_checker, operator, *left, *right, demand),
        ExprKind::Conversion(inner) => {
            let inner = type_check_expr(type_checker, *inner)?;
            let ty = match ast.ty {
                Some(ty) => ty,
                None => type_of(&inner)?,
            };

            Ok(Expr {
                kind: ExprKind::Conversion(Box::new(inner)),
                ty: Some(ty),
            })
        }
        ExprKind::LValToRVal(inner) => {
            let inner = type_check_expr(type_checker, *inner)?;
            let ty = type_of(&inner)?;

            Ok(Expr {
                kind: ExprKind::LValToRVal(Box::new(inner)),
                ty: Some(ty),
            })
        }
        ExprKind::Glue(fields) => type_check_glue(type_checker, fields),
        ExprKind::Dot { base, field, .. } => {
            let base = type_check_expr(type_checker, *base)?;
            let base_type = type_of(&base)?;

            let struct_type = type_checker.types.as_struct(base_type).ok_or_else(|| {
                Error::new(ErrorImpl::InvalidFieldAccess {
                    ty: type_checker.types.describe(base_type),
                })
            })?;
            let index = struct_type.field_index(&field).ok_or_else(|| {
                Error::new(ErrorImpl::UnknownField {
                    field: field.clone(),
                    ty: type_checker.types.describe(base_type),
                })
            })?;
            let ty = struct_type.fields[index];

            Ok(Expr {
                kind: ExprKind::Dot {
                    base: Box::new(base),
                    field,
                    index: Some(index),
                },
                ty: Some(ty),
            })
        }
        ExprKind::Index { base, index } => {
            let base = type_check_expr(type_checker, *base)?;
            let base_type = type_of(&base)?;

            let struct_type = type_checker.types.as_struct(base_type).ok_or_else(|| {
                Error::new(ErrorImpl::InvalidFieldAccess {
                    ty: type_checker.types.describe(base_type),
                })
            })?;
            let ty = *struct_type.fields.get(index).ok_or_else(|| {
                Error::new(ErrorImpl::UnknownField {
                    field: index.to_string(),
                    ty: type_checker.types.describe(base_type),
                })
            })?;

            Ok(Expr {
                kind: ExprKind::Index {
                    base: Box::new(base),
                    index,
                },
                ty: Some(ty),
            })
        }
    }
}

fn type_check_var_decl(type_checker: &mut TypeChecker, var_decl: VarDeclStmt) -> Result<Stmt, Error> {
    let symbol = var_decl.symbol.ok_or_else(|| {
        Error::new(ErrorImpl::UnresolvedName {
            name: var_decl.identifier.clone(),
        })
    })?;

    let value = match var_decl.assigned_value {
        Some(value) => Some(type_check_expr(type_checker, value)?),
        None => None,
    };

    if let Some(explicit_type) = var_decl.explicit_type {
        let ty = type_checker.resolve_type_spec(explicit_type)?;
        if !type_checker.symbols.set_type(symbol, ty) {
            return Err(Error::new(ErrorImpl::DuplicateDeclaration {
                name: var_decl.identifier,
            }));
        }
    }

    let assigned_value = match (type_checker.symbols.get_type(symbol), value) {
        (Some(symbol_type), Some(value)) => {
            let value_type = type_of(&value)?;
            match type_checker.types.common_type(symbol_type, value_type) {
                Promotion::Resolved(common) if common == symbol_type => {}
                _ => return Err(type_checker.mismatch(symbol_type, value_type)),
            }
            Some(convert_to(type_checker, value, symbol_type)?)
        }
        (None, Some(value)) => {
            let value_type = type_of(&value)?;
            let symbol_type = if type_checker.types.is_flexible(value_type) {
                debug!("defaulted `{}` to int(32)", var_decl.identifier);
                type_checker.types.get_default_int()
            } else {
                value_type
            };
            type_checker.symbols.set_type(symbol, symbol_type);
            Some(convert_to(type_checker, value, symbol_type)?)
        }
        (Some(_), None) => None,
        (None, None) => {
            return Err(Error::new(ErrorImpl::UnboundSymbolType {
                name: var_decl.identifier,
            }))
        }
    };

    Ok(Stmt::VarDecl(VarDeclStmt {
        identifier: var_decl.identifier,
        kind: var_decl.kind,
        explicit_type: var_decl.explicit_type,
        assigned_value,
        symbol: Some(symbol),
    }))
}

fn type_check_for(type_checker: &mut TypeChecker, for_stmt: ForStmt) -> Result<Stmt, Error> {
    let symbol = for_stmt.symbol.ok_or_else(|| {
        Error::new(ErrorImpl::UnresolvedName {
            name: for_stmt.variable.clone(),
        })
    })?;

    let bounds = for_stmt
        .bounds
        .into_iter()
        .map(|bound| type_check_expr(type_checker, bound))
        .collect::<Result<Vec<Expr>, Error>>()?;

    let mut common: Option<TypeId> = None;
    for bound in bounds.iter() {
        let bound_type = type_of(bound)?;
        if type_checker.types.as_struct(bound_type).is_some() {
            return Err(type_checker.expected_int(bound_type));
        }

        common = Some(match common {
            None => bound_type,
            Some(current) => match type_checker.types.common_type(current, bound_type) {
                Promotion::Resolved(ty) => ty,
                Promotion::StillFlexible
                    if type_checker.types.is_flexible(current)
                        && type_checker.types.is_flexible(bound_type) =>
                {
                    current
                }
                Promotion::StillFlexible => type_checker.types.get_default_int(),
                Promotion::Incompatible => return Err(type_checker.mismatch(current, bound_type)),
            },
        });
    }

    let loop_type = match common {
        Some(ty) if !type_checker.types.is_flexible(ty) && !type_checker.types.is_bool(ty) => ty,
        _ => {
            debug!("defaulted loop variable `{}` to int(32)", for_stmt.variable);
            type_checker.types.get_default_int()
        }
    };

    if !type_checker.symbols.set_type(symbol, loop_type) {
        return Err(Error::new(ErrorImpl::DuplicateDeclaration {
            name: for_stmt.variable,
        }));
    }

    let bounds = bounds
        .into_iter()
        .map(|bound| convert_to(type_checker, bound, loop_type))
        .collect::<Result<Vec<Expr>, Error>>()?;

    Ok(Stmt::For(ForStmt {
        variable: for_stmt.variable,
        symbol: Some(symbol),
        bounds,
        body: type_check_block(type_checker, for_stmt.body)?,
    }))
}

fn type_check_condition(type_checker: &mut TypeChecker, condition: Expr) -> Result<Expr, Error> {
    let condition = type_check_expr(type_checker, condition)?;
    let boolean = type_checker.types.get_bool();
    convert_to(type_checker, condition, boolean)
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, ast: Stmt) -> Result<Stmt, Error> {
    match ast {
        Stmt::VarDecl(var_decl) => type_check_var_decl(type_checker, var_decl),
        Stmt::Print(print) => {
            let value = type_check_expr(type_checker, print.value)?;
            let value_type = type_of(&value)?;

            let value = match type_checker.types.get(value_type) {
                Type::Flexible | Type::Bool => {
                    let default_int = type_checker.types.get_default_int();
                    convert_to(type_checker, value, default_int)?
                }
                Type::Int(_) => materialize(value)?,
                Type::Struct(_) => return Err(type_checker.expected_int(value_type)),
            };

            Ok(Stmt::Print(PrintStmt { value }))
        }
        Stmt::Expression(expression) => {
            let mut expression = type_check_expr(type_checker, expression.expression)?;
            if type_checker.types.is_flexible(type_of(&expression)?) {
                let default_int = type_checker.types.get_default_int();
                expression = convert_to(type_checker, expression, default_int)?;
            }

            Ok(Stmt::Expression(ExpressionStmt { expression }))
        }
        Stmt::If(if_stmt) => Ok(Stmt::If(IfStmt {
            condition: type_check_condition(type_checker, if_stmt.condition)?,
            then_body: type_check_block(type_checker, if_stmt.then_body)?,
            else_body: match if_stmt.else_body {
                Some(else_body) => Some(type_check_block(type_checker, else_body)?),
                None => None,
            },
        })),
        Stmt::While(while_stmt) => Ok(Stmt::While(WhileStmt {
            condition: type_check_condition(type_checker, while_stmt.condition)?,
            body: type_check_block(type_checker, while_stmt.body)?,
        })),
        Stmt::For(for_stmt) => type_check_for(type_checker, for_stmt),
        Stmt::Block(block) => Ok(Stmt::Block(type_check_block(type_checker, block)?)),
    }
}

pub fn type_check_block(type_checker: &mut TypeChecker, ast: Block) -> Result<Block, Error> {
    let body = ast
        .body
        .into_iter()
        .map(|stmt| type_check_stmt(type_checker, stmt))
        .collect::<Result<Vec<Stmt>, Error>>()?;

    Ok(Block::new(body))
}

/// Types every node of a resolved program, inserting conversions and loads.
pub fn type_check(ast: Program, symbols: SymbolTable) -> Result<(Program, TypeChecker), Error> {
    let mut type_checker = TypeChecker::new(symbols);

    let body = ast
        .body
        .into_iter()
        .map(|stmt| type_check_stmt(&mut type_checker, stmt))
        .collect::<Result<Vec<Stmt>, Error>>()?;

    debug!("type universe holds {} types", type_checker.types.len());
    Ok((Program::new(body), type_checker))
}
