//! Integration tests for end-to-end compilation.
//!
//! These tests run the complete pipeline from source text through
//! tokenization, parsing, name resolution, type checking and LLVM IR
//! generation, then assert on the printed module.

use inkwell::context::Context;
use paracl::{ast::dump::dump_program, check_source, compile_source, errors::errors::Error};

fn compile_to_ir(source: &str) -> Result<String, Error> {
    let context = Context::create();
    let compiled = compile_source(source, "test", &context)?;
    Ok(compiled.print_module())
}

fn error_name(source: &str) -> String {
    let error = compile_to_ir(source).unwrap_err();
    error.get_error_name().to_string()
}

#[test]
fn test_compile_empty_program() {
    let ir = compile_to_ir("").unwrap();

    assert!(ir.contains("define i32 @main()"));
    assert!(ir.contains("ret i32 0"));
}

#[test]
fn test_store_and_output() {
    let ir = compile_to_ir("x = 5; output(0, x);").unwrap();

    assert!(ir.contains("store i32 5"));
    assert!(ir.contains("call void @write_int("));
    assert!(ir.contains("i32 32)"));
}

#[test]
fn test_literal_out_of_range_is_rejected() {
    assert_eq!(error_name("x : int(8) = 300;"), "LiteralOutOfRange");
}

#[test]
fn test_literals_must_fit_the_signed_range() {
    assert_eq!(error_name("x : int(8) = 128;"), "LiteralOutOfRange");
    assert_eq!(error_name("x : int(8) = 200; output(0, x);"), "LiteralOutOfRange");
    assert_eq!(error_name("x : int(8) = -129; output(0, x);"), "LiteralOutOfRange");
    assert_eq!(error_name("x : int(1) = 1; output(0, x);"), "LiteralOutOfRange");

    let ir = compile_to_ir("x : int(8) = -128; y : int(8) = 127; output(0, x);").unwrap();
    assert!(ir.contains("store i8 -128"));
    assert!(ir.contains("store i8 127"));
}

#[test]
fn test_for_loop_over_bool_bounds_counts_in_int32() {
    let ir = compile_to_ir("for (i in (1 < 2) : (2 < 3)) { output(0, i); }").unwrap();

    assert!(!ir.contains("add i1"));
    assert!(ir.contains("alloca i32"));
}

#[test]
fn test_integer_condition_compares_with_zero() {
    let ir = compile_to_ir("x : int; if (x) { y = 1; } else { y = 2; }").unwrap();

    assert!(ir.contains("icmp ne i32"));
    assert!(ir.contains("br i1"));
}

#[test]
fn test_for_loop_with_three_bounds_fails() {
    assert_eq!(error_name("for (i in 0 : 3 : 5) { }"), "LoweringError");
}

#[test]
fn test_while_loop() {
    let source = "
        i = 0;
        while (i < 10) {
            output(0, i);
            i = i + 1;
        }
    ";
    let ir = compile_to_ir(source).unwrap();

    assert!(ir.contains("icmp slt i32"));
    assert!(ir.contains("add i32"));
    assert!(ir.contains("call void @write_int("));
}

#[test]
fn test_for_loop() {
    let ir = compile_to_ir("n : int = 4; for (i in 0 : n) { output(0, i); }").unwrap();

    assert!(ir.contains("icmp ne i32"));
    assert!(ir.contains("call void @write_int("));
}

#[test]
fn test_division() {
    let ir = compile_to_ir("a : int = 6; b = a / 2; output(0, b);").unwrap();

    assert!(ir.contains("sdiv i32"));
}

#[test]
fn test_struct_field_access() {
    let source = "
        p = (a: 1, b: 2);
        output(0, p.b);
        output(0, p.0);
    ";
    let ir = compile_to_ir(source).unwrap();

    assert!(ir.contains("alloca { i32, i32 }"));
    assert!(ir.contains("getelementptr inbounds { i32, i32 }"));
}

#[test]
fn test_narrow_input() {
    let ir = compile_to_ir("x : int(16) = input(0); output(0, x);").unwrap();

    assert!(ir.contains("call void @read_int("));
    assert!(ir.contains("trunc i64"));
    assert!(ir.contains("i32 16)"));
}

#[test]
fn test_shadowing_creates_a_second_slot() {
    let source = "
        x = 1;
        {
            x : int(8) = 2;
            output(0, x);
        }
        output(0, x);
    ";
    let ir = compile_to_ir(source).unwrap();

    assert!(ir.contains("alloca i32"));
    assert!(ir.contains("alloca i8"));
    assert!(ir.contains("store i8 2"));
}

#[test]
fn test_comments_are_ignored() {
    let ir = compile_to_ir("// nothing to see\nx = 1; // trailing\n").unwrap();

    assert!(ir.contains("store i32 1"));
}

#[test]
fn test_front_end_errors() {
    assert_eq!(error_name("output(1, x);"), "SyntaxError");
    assert_eq!(error_name("x = 1 $ 2;"), "UnrecognisedToken");
    assert_eq!(error_name("x = 99999999999999999999999;"), "NumberParseError");
}

#[test]
fn test_semantic_errors() {
    assert_eq!(error_name("output(0, y);"), "UnresolvedName");
    assert_eq!(error_name("{ y = 1; } output(0, y);"), "UnresolvedName");
    assert_eq!(error_name("b : bool = 1;"), "TypeMismatch");
    assert_eq!(error_name("x : int(8); x : int(16);"), "DuplicateDeclaration");
    assert_eq!(error_name("p = (a: 1); output(0, p.c);"), "UnknownField");
    assert_eq!(error_name("x = 1; output(0, x.a);"), "InvalidFieldAccess");
    assert_eq!(error_name("x : int(0);"), "InvalidWidth");
}

#[test]
fn test_check_source_dump() {
    let (program, type_checker) = check_source("x : int(8) = 1;").unwrap();

    let dump = dump_program(&program, Some(&type_checker.types));

    assert!(dump.contains("Declaration [Name: x]"));
    assert!(dump.contains("int(8)"));
}
