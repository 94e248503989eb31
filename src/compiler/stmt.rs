use inkwell::IntPredicate;

use crate::{
    ast::{
        ast::Block,
        statements::{ForStmt, IfStmt, PrintStmt, Stmt, VarDeclStmt, WhileStmt},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::type_checker::type_of,
};

use super::{
    compiler::{lowering_error, Compiler},
    expr::gen_expression,
    runtime::{build_io_buffer, WRITE_INT},
};

fn gen_block<'a>(compiler: &mut Compiler<'a>, block: &Block) -> Result<(), Error> {
    block
        .body
        .iter()
        .try_for_each(|statement| gen_statement(compiler, statement))
}

fn gen_var_decl<'a>(compiler: &mut Compiler<'a>, var_decl: &VarDeclStmt) -> Result<(), Error> {
    let symbol = var_decl.symbol.ok_or_else(|| {
        Error::new(ErrorImpl::UnresolvedName {
            name: var_decl.identifier.clone(),
        })
    })?;
    let slot = compiler.get_slot(symbol)?;

    if let Some(value) = &var_decl.assigned_value {
        let value = gen_expression(compiler, value)?;
        compiler.builder.build_store(slot, value)?;
    }

    Ok(())
}

fn gen_print<'a>(compiler: &mut Compiler<'a>, print: &PrintStmt) -> Result<(), Error> {
    let value = gen_expression(compiler, &print.value)?;
    let value = compiler.as_int(value)?;
    let bit_width = value.get_type().get_bit_width();

    let buffer = build_io_buffer(compiler, bit_width)?;
    let widened = if bit_width < buffer.value_type.get_bit_width() {
        compiler
            .builder
            .build_int_s_extend(value, buffer.value_type, "output_sext")?
    } else {
        value
    };
    compiler.builder.build_store(buffer.value, widened)?;

    let write_int = compiler.get_runtime_function(WRITE_INT)?;
    compiler.builder.build_call(
        write_int,
        &[
            buffer.words.into(),
            compiler.context.i32_type().const_int(bit_width as u64, false).into(),
        ],
        "",
    )?;

    Ok(())
}

fn gen_if<'a>(compiler: &mut Compiler<'a>, if_stmt: &IfStmt) -> Result<(), Error> {
    let condition = gen_expression(compiler, &if_stmt.condition)?;
    let condition = compiler.as_int(condition)?;

    let function = compiler.current_function()?;
    let then_block = compiler.create_basic_block("then", function);
    let else_block = match if_stmt.else_body {
        Some(_) => Some(compiler.create_basic_block("else", function)),
        None => None,
    };
    let merge_block = compiler.create_basic_block("merge", function);

    compiler
        .builder
        .build_conditional_branch(condition, then_block, else_block.unwrap_or(merge_block))?;

    compiler.builder.position_at_end(then_block);
    gen_block(compiler, &if_stmt.then_body)?;
    compiler.branch_if_open(merge_block)?;

    if let (Some(else_block), Some(else_body)) = (else_block, &if_stmt.else_body) {
        compiler.builder.position_at_end(else_block);
        gen_block(compiler, else_body)?;
        compiler.branch_if_open(merge_block)?;
    }

    compiler.builder.position_at_end(merge_block);
    Ok(())
}

fn gen_while<'a>(compiler: &mut Compiler<'a>, while_stmt: &WhileStmt) -> Result<(), Error> {
    let function = compiler.current_function()?;
    let test_block = compiler.create_basic_block("test", function);
    let body_block = compiler.create_basic_block("body", function);
    let merge_block = compiler.create_basic_block("merge", function);

    compiler.branch_if_open(test_block)?;

    compiler.builder.position_at_end(test_block);
    let condition = gen_expression(compiler, &while_stmt.condition)?;
    let condition = compiler.as_int(condition)?;
    compiler
        .builder
        .build_conditional_branch(condition, body_block, merge_block)?;

    compiler.builder.position_at_end(body_block);
    gen_block(compiler, &while_stmt.body)?;
    compiler.branch_if_open(test_block)?;

    compiler.builder.position_at_end(merge_block);
    Ok(())
}

/// `for (i in lower : upper)` iterates `i` over `[lower, upper)`.
fn gen_for<'a>(compiler: &mut Compiler<'a>, for_stmt: &ForStmt) -> Result<(), Error> {
    let (lower, upper) = match for_stmt.bounds.as_slice() {
        [lower, upper] => (lower, upper),
        bounds => {
            return Err(lowering_error(&format!(
                "for loops take exactly two bounds, found {}",
                bounds.len()
            )))
        }
    };

    let symbol = for_stmt.symbol.ok_or_else(|| {
        Error::new(ErrorImpl::UnresolvedName {
            name: for_stmt.variable.clone(),
        })
    })?;
    let slot = compiler.get_slot(symbol)?;
    let loop_type = compiler.convert_int_type(type_of(lower)?)?;

    let start = gen_expression(compiler, lower)?;
    compiler.builder.build_store(slot, start)?;
    let end = gen_expression(compiler, upper)?;
    let end = compiler.as_int(end)?;

    let function = compiler.current_function()?;
    let test_block = compiler.create_basic_block("test", function);
    let body_block = compiler.create_basic_block("body", function);
    let merge_block = compiler.create_basic_block("merge", function);

    compiler.branch_if_open(test_block)?;

    compiler.builder.position_at_end(test_block);
    let current = compiler.builder.build_load(slot, &for_stmt.variable)?;
    let current = compiler.as_int(current)?;
    let condition = compiler.builder.build_int_compare(
        IntPredicate::NE,
        current,
        end,
        "loop_test",
    )?;
    compiler
        .builder
        .build_conditional_branch(condition, body_block, merge_block)?;

    compiler.builder.position_at_end(body_block);
    gen_block(compiler, &for_stmt.body)?;
    if compiler.is_block_open() {
        let current = compiler.builder.build_load(slot, &for_stmt.variable)?;
        let current = compiler.as_int(current)?;
        let next = compiler
            .builder
            .build_int_add(current, loop_type.const_int(1, false), "next")?;
        compiler.builder.build_store(slot, next)?;
        compiler.builder.build_unconditional_branch(test_block)?;
    }

    compiler.builder.position_at_end(merge_block);
    Ok(())
}

pub fn gen_statement<'a>(compiler: &mut Compiler<'a>, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::VarDecl(var_decl) => gen_var_decl(compiler, var_decl),
        Stmt::Print(print) => gen_print(compiler, print),
        Stmt::Expression(expression) => {
            gen_expression(compiler, &expression.expression)?;
            Ok(())
        }
        Stmt::If(if_stmt) => gen_if(compiler, if_stmt),
        Stmt::While(while_stmt) => gen_while(compiler, while_stmt),
        Stmt::For(for_stmt) => gen_for(compiler, for_stmt),
        Stmt::Block(block) => gen_block(compiler, block),
    }
}
