//! Declarations of the runtime procedures the generated code calls.
//!
//! Both procedures exchange integers through a caller-owned buffer of 64-bit
//! words, large enough for the value's bit width, so integers of any width
//! can cross the boundary:
//!
//! - `void read_int(i64* buffer, i32 bit_width)`
//! - `void write_int(i64* buffer, i32 bit_width)`

use inkwell::{
    module::Linkage,
    types::IntType,
    values::PointerValue,
    AddressSpace,
};

use crate::errors::errors::Error;

use super::compiler::Compiler;

pub const READ_INT: &str = "read_int";
pub const WRITE_INT: &str = "write_int";

/// Number of 64-bit words needed to hold `bit_width` bits.
pub fn buffer_words(bit_width: u32) -> u32 {
    (bit_width + 63) / 64
}

/// Declares the runtime procedures as external functions of the module.
pub fn declare_runtime(compiler: &Compiler) {
    let buffer_type = compiler.context.i64_type().ptr_type(AddressSpace::default());

    let io_type = compiler.context.void_type().fn_type(
        &[buffer_type.into(), compiler.context.i32_type().into()],
        false,
    );

    for name in [READ_INT, WRITE_INT] {
        if compiler.module.get_function(name).is_none() {
            compiler
                .module
                .add_function(name, io_type, Some(Linkage::External));
        }
    }
}

/// Stack scratch buffer used to pass one integer to or from the runtime.
pub struct IoBuffer<'a> {
    /// The buffer viewed as 64-bit words, as the runtime expects it
    pub words: PointerValue<'a>,
    /// The buffer viewed as a single integer spanning every word
    pub value: PointerValue<'a>,
    pub value_type: IntType<'a>,
}

/// Allocates a scratch buffer large enough for an integer of `bit_width` bits.
pub fn build_io_buffer<'a>(compiler: &Compiler<'a>, bit_width: u32) -> Result<IoBuffer<'a>, Error> {
    let words = buffer_words(bit_width);
    let word_type = compiler.context.i64_type();
    let value_type = compiler.context.custom_width_int_type(words * 64);

    let buffer = compiler.build_entry_alloca(word_type.array_type(words).into(), "io_buffer")?;

    Ok(IoBuffer {
        words: compiler.builder.build_pointer_cast(
            buffer,
            word_type.ptr_type(AddressSpace::default()),
            "io_words",
        )?,
        value: compiler.builder.build_pointer_cast(
            buffer,
            value_type.ptr_type(AddressSpace::default()),
            "io_value",
        )?,
        value_type,
    })
}
