//! The emitter state and module-level operations.
//!
//! This module contains the core Compiler structure and lowers the typed AST
//! into a single LLVM function. It manages the LLVM context, module and builder,
//! maps checked types to LLVM types and owns the stack slot of every symbol.

use std::{collections::HashMap, mem, path::Path};

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine},
    types::{BasicTypeEnum, FunctionType, IntType, StructType},
    values::{BasicValueEnum, FunctionValue, IntValue, PointerValue},
    OptimizationLevel,
};
use log::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    resolver::symbols::SymbolId,
    type_checker::type_checker::TypeChecker,
    types::types::{Type, TypeId},
};

use super::{runtime::declare_runtime, stmt::gen_statement};

/// Name of the function the whole program is lowered into.
pub const ENTRY_FUNCTION: &str = "main";

pub(super) fn lowering_error(message: &str) -> Error {
    Error::new(ErrorImpl::LoweringError {
        message: String::from(message),
    })
}

/// The main compiler structure that holds the state of the lowering.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct Compiler<'a> {
    /// The typed program being compiled
    pub ast: Program,
    /// Type and symbol arenas produced by the type checker
    pub type_checker: TypeChecker,

    /// Stack slot of every symbol lowered so far
    pub slots: HashMap<SymbolId, PointerValue<'a>>,
    /// LLVM struct types created for checked struct types
    pub struct_types: HashMap<TypeId, StructType<'a>>,
    /// The function currently being filled
    pub function: Option<FunctionValue<'a>>,

    pub context: &'a Context,
    /// Holds `main` and the runtime declarations
    pub module: Module<'a>,
    /// Positioned in the block currently being filled
    pub builder: Builder<'a>,
}

impl<'a> Compiler<'a> {
    /// Sets up an empty module named `module_name`; nothing is lowered yet.
    pub fn new(ast: Program, type_checker: TypeChecker, context: &'a Context, module_name: &str) -> Self {
        Compiler {
            ast,
            type_checker,
            slots: HashMap::new(),
            struct_types: HashMap::new(),
            function: None,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            context,
        }
    }

    /// Writes the textual IR of the module to a file.
    pub fn save_module_to_file(&self, output_file: &Path) -> Result<(), Error> {
        self.module.print_to_file(output_file).map_err(|message| {
            Error::new(ErrorImpl::LoweringError {
                message: message.to_string(),
            })
        })
    }

    /// Writes a native object file for the host target.
    ///
    /// The module's triple and data layout are set to the host's before
    /// emission, so the textual IR printed afterwards carries them too.
    pub fn write_object_file(&self, output_file: &Path) -> Result<(), Error> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(|message| lowering_error(&message))?;

        let target_triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&target_triple)
            .map_err(|message| lowering_error(&message.to_string()))?;
        let target_machine = target
            .create_target_machine(
                &target_triple,
                "generic",
                "",
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| lowering_error("could not create a target machine for the host"))?;

        self.module.set_triple(&target_triple);
        self.module
            .set_data_layout(&target_machine.get_target_data().get_data_layout());

        debug!("writing object file for {:?}", target_triple);
        target_machine
            .write_to_file(&self.module, FileType::Object, output_file)
            .map_err(|message| lowering_error(&message.to_string()))
    }

    /// Returns the textual IR of the module.
    pub fn print_module(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Lowers the whole program into the entry function and verifies the module.
    fn compile(&mut self) -> Result<(), Error> {
        declare_runtime(self);

        let function = self.create_function(ENTRY_FUNCTION, self.context.i32_type().fn_type(&[], false));
        self.function = Some(function);

        self.gen()?;

        if self.is_block_open() {
            self.builder
                .build_return(Some(&self.context.i32_type().const_zero()))?;
        }

        self.verify()
    }

    fn gen(&mut self) -> Result<(), Error> {
        let ast = mem::take(&mut self.ast);

        let result = ast
            .body
            .iter()
            .try_for_each(|statement| gen_statement(self, statement));

        self.ast = ast;
        result
    }

    fn verify(&self) -> Result<(), Error> {
        self.module.verify().map_err(|message| {
            Error::new(ErrorImpl::InternalVerificationFailure {
                message: message.to_string(),
            })
        })
    }

    /// Converts a checked type to an LLVM basic type.
    ///
    /// Struct types are created on first use and cached by their handle.
    pub fn convert_type(&mut self, ty: TypeId) -> Result<BasicTypeEnum<'a>, Error> {
        match self.type_checker.types.get(ty).clone() {
            Type::Int(width) => Ok(self.context.custom_width_int_type(width).into()),
            Type::Bool => Ok(self.context.bool_type().into()),
            Type::Flexible => Err(lowering_error("flexible type reached the emitter")),
            Type::Struct(struct_type) => {
                if let Some(llvm_type) = self.struct_types.get(&ty) {
                    return Ok((*llvm_type).into());
                }

                let fields = struct_type
                    .fields
                    .iter()
                    .map(|field| self.convert_type(*field))
                    .collect::<Result<Vec<BasicTypeEnum<'a>>, Error>>()?;
                let llvm_type = self.context.struct_type(&fields, false);
                self.struct_types.insert(ty, llvm_type);
                Ok(llvm_type.into())
            }
        }
    }

    /// LLVM integer type of an integer or boolean checked type.
    pub fn convert_int_type(&mut self, ty: TypeId) -> Result<IntType<'a>, Error> {
        match self.convert_type(ty)? {
            BasicTypeEnum::IntType(int_type) => Ok(int_type),
            _ => Err(lowering_error("expected an integer type")),
        }
    }

    pub fn current_function(&self) -> Result<FunctionValue<'a>, Error> {
        self.function
            .ok_or_else(|| lowering_error("no function is being generated"))
    }

    /// Allocates a stack slot at the start of the entry block.
    ///
    /// The slot dominates every use, wherever the first reference appears.
    pub fn build_entry_alloca(&self, ty: BasicTypeEnum<'a>, name: &str) -> Result<PointerValue<'a>, Error> {
        let entry = self
            .current_function()?
            .get_first_basic_block()
            .ok_or_else(|| lowering_error("function has no entry block"))?;

        let builder = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        Ok(builder.build_alloca(ty, name)?)
    }

    /// Returns the stack slot of a symbol, allocating it on first reference.
    pub fn get_slot(&mut self, symbol: SymbolId) -> Result<PointerValue<'a>, Error> {
        if let Some(slot) = self.slots.get(&symbol) {
            return Ok(*slot);
        }

        let name = self.type_checker.symbols.get(symbol).name.clone();
        let ty = self
            .type_checker
            .symbols
            .get_type(symbol)
            .ok_or_else(|| Error::new(ErrorImpl::UnboundSymbolType { name: name.clone() }))?;

        let llvm_type = self.convert_type(ty)?;
        let slot = self.build_entry_alloca(llvm_type, &name)?;
        debug!("allocated slot for `{}`", name);

        self.slots.insert(symbol, slot);
        Ok(slot)
    }

    pub fn get_runtime_function(&self, name: &str) -> Result<FunctionValue<'a>, Error> {
        self.module
            .get_function(name)
            .ok_or_else(|| lowering_error(&format!("runtime function `{}` is not declared", name)))
    }

    /// Whether the block under the builder still lacks a terminator.
    pub fn is_block_open(&self) -> bool {
        self.builder
            .get_insert_block()
            .map_or(false, |block| block.get_terminator().is_none())
    }

    /// Jumps to `target` unless the current block already ends in a terminator.
    pub fn branch_if_open(&self, target: BasicBlock<'a>) -> Result<(), Error> {
        if self.is_block_open() {
            self.builder.build_unconditional_branch(target)?;
        }
        Ok(())
    }

    /// Creates a function with an `entry` block and positions the builder in it.
    pub fn create_function(&self, name: &str, function_type: FunctionType<'a>) -> FunctionValue<'a> {
        let function = match self.module.get_function(name) {
            Some(function) => function,
            None => self.module.add_function(name, function_type, Some(Linkage::External)),
        };

        let entry = self.create_basic_block("entry", function);
        self.builder.position_at_end(entry);

        function
    }

    pub fn create_basic_block(&self, name: &str, function: FunctionValue<'a>) -> BasicBlock<'a> {
        self.context.append_basic_block(function, name)
    }

    pub fn as_int(&self, value: BasicValueEnum<'a>) -> Result<IntValue<'a>, Error> {
        match value {
            BasicValueEnum::IntValue(value) => Ok(value),
            _ => Err(lowering_error("expected an integer value")),
        }
    }

    pub fn as_pointer(&self, value: BasicValueEnum<'a>) -> Result<PointerValue<'a>, Error> {
        match value {
            BasicValueEnum::PointerValue(value) => Ok(value),
            _ => Err(lowering_error("expected an address")),
        }
    }
}

/// Lowers a checked program into a verified LLVM module.
///
/// # Arguments
///
/// * `ast` - The typed program
/// * `type_checker` - Type checker holding the type and symbol arenas
/// * `module_name` - Name of the produced module
/// * `context` - Reference to the LLVM context
///
/// # Returns
///
/// The compiler instance owning the finished module, or the first error hit.
pub fn compile<'a>(
    ast: Program,
    type_checker: TypeChecker,
    module_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, Error> {
    let mut compiler = Compiler::new(ast, type_checker, context, module_name);

    compiler.compile()?;

    Ok(compiler)
}
