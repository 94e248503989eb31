use inkwell::{values::BasicValueEnum, IntPredicate};

use crate::{
    ast::expressions::{Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
    type_checker::type_checker::type_of,
    types::types::Type,
};

use super::{
    compiler::{lowering_error, Compiler},
    runtime::{build_io_buffer, READ_INT},
};

fn relational_predicate(operator: &str, unsigned: bool) -> Option<IntPredicate> {
    let predicate = match (operator, unsigned) {
        ("==", _) => IntPredicate::EQ,
        ("!=", _) => IntPredicate::NE,
        ("<", false) => IntPredicate::SLT,
        ("<", true) => IntPredicate::ULT,
        (">", false) => IntPredicate::SGT,
        (">", true) => IntPredicate::UGT,
        ("<=", false) => IntPredicate::SLE,
        ("<=", true) => IntPredicate::ULE,
        (">=", false) => IntPredicate::SGE,
        (">=", true) => IntPredicate::UGE,
        _ => return None,
    };
    Some(predicate)
}

fn gen_binary<'a>(
    compiler: &mut Compiler<'a>,
    operator: &str,
    left: &Expr,
    right: &Expr,
) -> Result<BasicValueEnum<'a>, Error> {
    let unsigned = compiler.type_checker.types.is_bool(type_of(left)?);

    let lhs = gen_expression(compiler, left)?;
    let lhs = compiler.as_int(lhs)?;
    let rhs = gen_expression(compiler, right)?;
    let rhs = compiler.as_int(rhs)?;

    let builder = &compiler.builder;
    let value = match operator {
        "+" => builder.build_int_add(lhs, rhs, "add")?,
        "-" => builder.build_int_sub(lhs, rhs, "sub")?,
        "*" => builder.build_int_mul(lhs, rhs, "mul")?,
        "/" => builder.build_int_signed_div(lhs, rhs, "div")?,
        "&&" => builder.build_and(lhs, rhs, "and")?,
        "||" => builder.build_or(lhs, rhs, "or")?,
        _ => {
            let predicate = relational_predicate(operator, unsigned).ok_or_else(|| {
                Error::new(ErrorImpl::UnknownOperator {
                    operator: String::from(operator),
                })
            })?;
            builder.build_int_compare(predicate, lhs, rhs, "cmp")?
        }
    };

    Ok(value.into())
}

fn gen_conversion<'a>(
    compiler: &mut Compiler<'a>,
    inner: &Expr,
    target: &Expr,
) -> Result<BasicValueEnum<'a>, Error> {
    let from = type_of(inner)?;
    let to = type_of(target)?;

    let value = gen_expression(compiler, inner)?;
    let value = compiler.as_int(value)?;
    let to_type = compiler.convert_int_type(to)?;

    let from_kind = compiler.type_checker.types.get(from).clone();
    let to_kind = compiler.type_checker.types.get(to).clone();

    let converted = match (from_kind, to_kind) {
        (Type::Bool, Type::Bool) => value,
        (Type::Bool, Type::Int(_)) => compiler.builder.build_int_z_extend(value, to_type, "zext")?,
        (Type::Int(from_width), Type::Int(to_width)) if from_width == to_width => value,
        (Type::Int(from_width), Type::Int(to_width)) if from_width < to_width => {
            compiler.builder.build_int_s_extend(value, to_type, "sext")?
        }
        (Type::Int(_), Type::Bool) => compiler.builder.build_int_compare(
            IntPredicate::NE,
            value,
            value.get_type().const_zero(),
            "tobool",
        )?,
        _ => {
            return Err(lowering_error(&format!(
                "unsupported conversion from {} to {}",
                compiler.type_checker.types.describe(from),
                compiler.type_checker.types.describe(to)
            )))
        }
    };

    Ok(converted.into())
}

fn gen_input<'a>(compiler: &mut Compiler<'a>, expression: &Expr) -> Result<BasicValueEnum<'a>, Error> {
    let value_type = compiler.convert_int_type(type_of(expression)?)?;
    let bit_width = value_type.get_bit_width();

    let buffer = build_io_buffer(compiler, bit_width)?;
    let read_int = compiler.get_runtime_function(READ_INT)?;
    compiler.builder.build_call(
        read_int,
        &[
            buffer.words.into(),
            compiler.context.i32_type().const_int(bit_width as u64, false).into(),
        ],
        "",
    )?;

    let loaded = compiler.builder.build_load(buffer.value, "input")?;
    let loaded = compiler.as_int(loaded)?;

    if bit_width < buffer.value_type.get_bit_width() {
        Ok(compiler
            .builder
            .build_int_truncate(loaded, value_type, "input_trunc")?
            .into())
    } else {
        Ok(loaded.into())
    }
}

/// Generates LLVM IR for the given expression.
///
/// Storage expressions (`Id`, `Dot`, `Index` and struct literals) yield the
/// address of their storage; every other expression yields a value.
pub fn gen_expression<'a>(compiler: &mut Compiler<'a>, expression: &Expr) -> Result<BasicValueEnum<'a>, Error> {
    match &expression.kind {
        ExprKind::IntLit(value) => {
            let int_type = compiler.convert_int_type(type_of(expression)?)?;
            Ok(int_type.const_int(*value, false).into())
        }
        ExprKind::Id { name, symbol } => {
            let symbol = symbol.ok_or_else(|| Error::new(ErrorImpl::UnresolvedName { name: name.clone() }))?;
            Ok(compiler.get_slot(symbol)?.into())
        }
        ExprKind::Input => gen_input(compiler, expression),
        ExprKind::Unary { operand, .. } => {
            let value = gen_expression(compiler, operand)?;
            let value = compiler.as_int(value)?;
            Ok(compiler.builder.build_int_neg(value, "neg")?.into())
        }
        ExprKind::Binary {
            operator,
            left,
            right,
        } => gen_binary(compiler, operator, left, right),
        ExprKind::Conversion(inner) => gen_conversion(compiler, inner, expression),
        ExprKind::LValToRVal(inner) => {
            let address = gen_expression(compiler, inner)?;
            let address = compiler.as_pointer(address)?;
            Ok(compiler.builder.build_load(address, "load")?)
        }
        ExprKind::Glue(fields) => {
            let struct_type = compiler.convert_type(type_of(expression)?)?;
            let slot = compiler.build_entry_alloca(struct_type, "glue")?;

            for (index, field) in fields.iter().enumerate() {
                let value = gen_expression(compiler, &field.value)?;
                let address = compiler.builder.build_struct_gep(slot, index as u32, "field")?;
                compiler.builder.build_store(address, value)?;
            }

            Ok(slot.into())
        }
        ExprKind::Dot { base, field, index } => {
            let index = index.ok_or_else(|| lowering_error(&format!("field `{}` was never resolved", field)))?;
            let address = gen_expression(compiler, base)?;
            let address = compiler.as_pointer(address)?;
            Ok(compiler.builder.build_struct_gep(address, index as u32, field)?.into())
        }
        ExprKind::Index { base, index } => {
            let address = gen_expression(compiler, base)?;
            let address = compiler.as_pointer(address)?;
            Ok(compiler
                .builder
                .build_struct_gep(address, *index as u32, "index")?
                .into())
        }
    }
}
