//! Unit tests for type inference and checking.

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Block, Program, TypeSpec},
        dump::dump_program,
        expressions::{Expr, ExprKind, GlueField},
        statements::{ExpressionStmt, ForStmt, IfStmt, PrintStmt, Stmt, VarDeclStmt},
    },
    errors::errors::Error,
    resolver::{resolver::resolve, symbols::SymbolTable},
    types::types::Type,
};

use super::type_checker::{convert_to, literal_fits, type_check, type_check_expr, TypeChecker};

fn check(program: Program) -> Result<(Program, TypeChecker), Error> {
    let (program, symbols) = resolve(program)?;
    type_check(program, symbols)
}

fn print(value: Expr) -> Stmt {
    Stmt::Print(PrintStmt { value })
}

fn initializer(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::VarDecl(var_decl) => var_decl.assigned_value.as_ref().unwrap(),
        other => panic!("expected variable declaration, found {:?}", other),
    }
}

fn printed(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Print(print) => &print.value,
        other => panic!("expected print statement, found {:?}", other),
    }
}

#[test]
fn test_flexible_literal_takes_declared_type() {
    let program = Program::new(vec![VarDeclStmt::declaration(
        "x",
        Some(TypeSpec::Int(8)),
        Some(Expr::int(5)),
    )]);

    let (program, mut checker) = check(program).unwrap();

    let value = initializer(&program.body[0]);
    assert_eq!(value.kind, ExprKind::IntLit(5));
    assert_eq!(value.ty, Some(checker.types.get_int(8)));
}

#[test]
fn test_convert_flexible_in_place_then_no_op() {
    let mut checker = TypeChecker::new(SymbolTable::new());
    let int8 = checker.types.get_int(8);

    let literal = type_check_expr(&mut checker, Expr::int(7)).unwrap();
    assert!(checker.types.is_flexible(literal.ty.unwrap()));

    let converted = convert_to(&mut checker, literal, int8).unwrap();
    assert_eq!(converted.kind, ExprKind::IntLit(7));
    assert_eq!(converted.ty, Some(int8));

    let again = convert_to(&mut checker, converted.clone(), int8).unwrap();
    assert_eq!(again, converted);
}

#[test]
fn test_default_width_for_untyped_assignment() {
    let program = Program::new(vec![VarDeclStmt::assignment("x", Expr::int(5))]);

    let (program, mut checker) = check(program).unwrap();

    let value = initializer(&program.body[0]);
    assert_eq!(value.ty, Some(checker.types.get_int(32)));
    assert_eq!(checker.symbols.iter().next().unwrap().1.ty, Some(checker.types.get_int(32)));
}

#[test]
fn test_widening_inserts_conversion() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(8)), Some(Expr::int(1))),
        VarDeclStmt::declaration("y", Some(TypeSpec::Int(16)), Some(Expr::id("x"))),
    ]);

    let (program, mut checker) = check(program).unwrap();

    let value = initializer(&program.body[1]);
    assert_eq!(value.ty, Some(checker.types.get_int(16)));
    match &value.kind {
        ExprKind::Conversion(inner) => {
            assert_eq!(inner.ty, Some(checker.types.get_int(8)));
            assert!(matches!(inner.kind, ExprKind::LValToRVal(_)));
        }
        other => panic!("expected conversion, found {:?}", other),
    }
}

#[test]
fn test_narrowing_is_rejected() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(16)), Some(Expr::int(1))),
        VarDeclStmt::declaration("y", Some(TypeSpec::Int(8)), Some(Expr::id("x"))),
    ]);

    let error = check(program).unwrap_err();

    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_literal_out_of_range() {
    let program = Program::new(vec![VarDeclStmt::declaration(
        "x",
        Some(TypeSpec::Int(8)),
        Some(Expr::int(300)),
    )]);

    let error = check(program).unwrap_err();

    assert_eq!(error.get_error_name(), "LiteralOutOfRange");
    assert_eq!(error.get_tip().to_string(), "Literal `300` does not fit in `int(8)`");
}

fn declare_int8(value: Expr) -> Result<(Program, TypeChecker), Error> {
    check(Program::new(vec![VarDeclStmt::declaration(
        "x",
        Some(TypeSpec::Int(8)),
        Some(value),
    )]))
}

#[test]
fn test_signed_range_accepted() {
    let (program, mut checker) = declare_int8(Expr::int(127)).unwrap();
    let int8 = checker.types.get_int(8);
    assert_eq!(initializer(&program.body[0]).ty, Some(int8));

    let (program, mut checker) = declare_int8(Expr::unary("-", Expr::int(128))).unwrap();
    let int8 = checker.types.get_int(8);
    let negated = initializer(&program.body[0]);
    assert_eq!(negated.ty, Some(int8));
    match &negated.kind {
        ExprKind::Unary { operand, .. } => {
            assert_eq!(operand.kind, ExprKind::IntLit(128));
            assert_eq!(operand.ty, Some(int8));
        }
        other => panic!("expected unary expression, found {:?}", other),
    }
}

#[test]
fn test_signed_range_rejected() {
    let error = declare_int8(Expr::int(128)).unwrap_err();
    assert_eq!(error.get_error_name(), "LiteralOutOfRange");
    assert_eq!(error.get_tip().to_string(), "Literal `128` does not fit in `int(8)`");

    let error = declare_int8(Expr::unary("-", Expr::int(129))).unwrap_err();
    assert_eq!(error.get_error_name(), "LiteralOutOfRange");
    assert_eq!(error.get_tip().to_string(), "Literal `-129` does not fit in `int(8)`");

    let error = declare_int8(Expr::int(200)).unwrap_err();
    assert_eq!(error.get_error_name(), "LiteralOutOfRange");
}

#[test]
fn test_one_bit_integer_holds_zero_and_minus_one() {
    let one_bit = |value: Expr| {
        check(Program::new(vec![VarDeclStmt::declaration(
            "x",
            Some(TypeSpec::Int(1)),
            Some(value),
        )]))
    };

    assert!(one_bit(Expr::int(0)).is_ok());
    assert!(one_bit(Expr::unary("-", Expr::int(1))).is_ok());
    assert_eq!(
        one_bit(Expr::int(1)).unwrap_err().get_error_name(),
        "LiteralOutOfRange"
    );
}

#[test]
fn test_literal_fits_at_64_bits_and_wider() {
    assert!(literal_fits(i64::MAX as u64, 64, false));
    assert!(!literal_fits(1 << 63, 64, false));
    assert!(literal_fits(1 << 63, 64, true));
    assert!(!literal_fits(u64::MAX, 64, true));
    assert!(literal_fits(u64::MAX, 65, false));
}

#[test]
fn test_flexible_arithmetic_takes_demand() {
    let program = Program::new(vec![VarDeclStmt::declaration(
        "x",
        Some(TypeSpec::Int(8)),
        Some(Expr::binary("+", Expr::int(1), Expr::int(2))),
    )]);

    let (program, mut checker) = check(program).unwrap();

    let int8 = checker.types.get_int(8);
    let value = initializer(&program.body[0]);
    assert_eq!(value.ty, Some(int8));
    match &value.kind {
        ExprKind::Binary { left, right, .. } => {
            assert_eq!(left.kind, ExprKind::IntLit(1));
            assert_eq!(left.ty, Some(int8));
            assert_eq!(right.kind, ExprKind::IntLit(2));
            assert_eq!(right.ty, Some(int8));
        }
        other => panic!("expected binary expression, found {:?}", other),
    }
}

#[test]
fn test_binary_promotes_to_wider_operand() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("a", Some(TypeSpec::Int(8)), Some(Expr::int(1))),
        VarDeclStmt::declaration("b", Some(TypeSpec::Int(16)), Some(Expr::int(2))),
        VarDeclStmt::assignment("c", Expr::binary("*", Expr::id("a"), Expr::id("b"))),
    ]);

    let (program, mut checker) = check(program).unwrap();

    let int16 = checker.types.get_int(16);
    let value = initializer(&program.body[2]);
    assert_eq!(value.ty, Some(int16));
    match &value.kind {
        ExprKind::Binary { left, right, .. } => {
            assert!(matches!(left.kind, ExprKind::Conversion(_)));
            assert!(matches!(right.kind, ExprKind::LValToRVal(_)));
            assert_eq!(left.ty, Some(int16));
        }
        other => panic!("expected binary expression, found {:?}", other),
    }
}

#[test]
fn test_duplicate_declaration() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(32)), Some(Expr::int(1))),
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(8)), Some(Expr::int(2))),
    ]);

    let error = check(program).unwrap_err();

    assert_eq!(error.get_error_name(), "DuplicateDeclaration");
}

#[test]
fn test_redeclaration_without_annotation_is_assignment() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(8)), Some(Expr::int(1))),
        VarDeclStmt::declaration("x", None, Some(Expr::int(2))),
    ]);

    let (program, mut checker) = check(program).unwrap();

    assert_eq!(initializer(&program.body[1]).ty, Some(checker.types.get_int(8)));
}

#[test]
fn test_zero_width_is_invalid() {
    let program = Program::new(vec![VarDeclStmt::declaration("x", Some(TypeSpec::Int(0)), None)]);

    let error = check(program).unwrap_err();

    assert_eq!(error.get_error_name(), "InvalidWidth");
}

#[test]
fn test_symbol_without_type() {
    let program = Program::new(vec![VarDeclStmt::declaration("x", None, None)]);

    let error = check(program).unwrap_err();

    assert_eq!(error.get_error_name(), "UnboundSymbolType");
}

#[test]
fn test_unknown_operators() {
    let binary = Program::new(vec![print(Expr::binary("%", Expr::int(1), Expr::int(2)))]);
    let unary = Program::new(vec![print(Expr::unary("!", Expr::int(1)))]);

    assert_eq!(check(binary).unwrap_err().get_error_name(), "UnknownOperator");
    assert_eq!(check(unary).unwrap_err().get_error_name(), "UnknownOperator");
}

#[test]
fn test_relational_result_is_bool() {
    let program = Program::new(vec![VarDeclStmt::assignment(
        "b",
        Expr::binary("<", Expr::int(1), Expr::int(2)),
    )]);

    let (program, mut checker) = check(program).unwrap();

    let int32 = checker.types.get_int(32);
    let value = initializer(&program.body[0]);
    assert_eq!(value.ty, Some(checker.types.get_bool()));
    match &value.kind {
        ExprKind::Binary { left, right, .. } => {
            assert_eq!(left.ty, Some(int32));
            assert_eq!(right.ty, Some(int32));
        }
        other => panic!("expected binary expression, found {:?}", other),
    }
}

#[test]
fn test_condition_converted_to_bool() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(32)), Some(Expr::int(1))),
        Stmt::If(IfStmt {
            condition: Expr::id("x"),
            then_body: Block::new(vec![VarDeclStmt::assignment("y", Expr::int(1))]),
            else_body: Some(Block::new(vec![VarDeclStmt::assignment("y", Expr::int(2))])),
        }),
    ]);

    let (program, mut checker) = check(program).unwrap();

    match &program.body[1] {
        Stmt::If(if_stmt) => {
            assert_eq!(if_stmt.condition.ty, Some(checker.types.get_bool()));
            assert!(matches!(if_stmt.condition.kind, ExprKind::Conversion(_)));
        }
        other => panic!("expected if statement, found {:?}", other),
    }
}

#[test]
fn test_print_and_expression_defaults() {
    let program = Program::new(vec![
        print(Expr::binary("==", Expr::int(1), Expr::int(1))),
        Stmt::Expression(ExpressionStmt {
            expression: Expr::binary("+", Expr::int(1), Expr::input()),
        }),
    ]);

    let (program, mut checker) = check(program).unwrap();

    let int32 = checker.types.get_int(32);
    let value = printed(&program.body[0]);
    assert_eq!(value.ty, Some(int32));
    assert!(matches!(value.kind, ExprKind::Conversion(_)));

    match &program.body[1] {
        Stmt::Expression(expression) => {
            assert_eq!(expression.expression.ty, Some(int32));
            match &expression.expression.kind {
                ExprKind::Binary { right, .. } => {
                    assert_eq!(right.kind, ExprKind::Input);
                    assert_eq!(right.ty, Some(int32));
                }
                other => panic!("expected binary expression, found {:?}", other),
            }
        }
        other => panic!("expected expression statement, found {:?}", other),
    }
}

#[test]
fn test_for_loop_variable_type() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("n", Some(TypeSpec::Int(16)), Some(Expr::int(10))),
        Stmt::For(ForStmt {
            variable: String::from("i"),
            symbol: None,
            bounds: vec![Expr::int(0), Expr::id("n")],
            body: Block::new(vec![print(Expr::id("i"))]),
        }),
    ]);

    let (program, mut checker) = check(program).unwrap();

    let int16 = checker.types.get_int(16);
    match &program.body[1] {
        Stmt::For(for_stmt) => {
            assert_eq!(checker.symbols.get_type(for_stmt.symbol.unwrap()), Some(int16));
            assert_eq!(for_stmt.bounds[0].kind, ExprKind::IntLit(0));
            assert_eq!(for_stmt.bounds[0].ty, Some(int16));
            assert!(matches!(for_stmt.bounds[1].kind, ExprKind::LValToRVal(_)));
        }
        other => panic!("expected for statement, found {:?}", other),
    }
}

#[test]
fn test_bool_bounds_give_integer_loop_variable() {
    let program = Program::new(vec![Stmt::For(ForStmt {
        variable: String::from("i"),
        symbol: None,
        bounds: vec![
            Expr::binary("<", Expr::int(1), Expr::int(2)),
            Expr::binary("<", Expr::int(2), Expr::int(3)),
        ],
        body: Block::default(),
    })]);

    let (program, mut checker) = check(program).unwrap();

    let int32 = checker.types.get_int(32);
    match &program.body[0] {
        Stmt::For(for_stmt) => {
            assert_eq!(checker.symbols.get_type(for_stmt.symbol.unwrap()), Some(int32));
            for bound in for_stmt.bounds.iter() {
                assert_eq!(bound.ty, Some(int32));
                assert!(matches!(bound.kind, ExprKind::Conversion(_)));
            }
        }
        other => panic!("expected for statement, found {:?}", other),
    }
}

#[test]
fn test_struct_literal_and_field_access() {
    let program = Program::new(vec![
        VarDeclStmt::assignment(
            "p",
            Expr::glue(vec![
                GlueField::named("a", Expr::int(1)),
                GlueField::positional(Expr::binary(">", Expr::int(2), Expr::int(1))),
            ]),
        ),
        print(Expr::dot(Expr::id("p"), "a")),
        print(Expr::index(Expr::id("p"), 1)),
    ]);

    let (program, mut checker) = check(program).unwrap();

    let int32 = checker.types.get_int(32);
    let boolean = checker.types.get_bool();
    let literal = initializer(&program.body[0]);
    let struct_type = checker.types.as_struct(literal.ty.unwrap()).unwrap();
    assert_eq!(struct_type.fields, vec![int32, boolean]);
    assert_eq!(struct_type.field_index("a"), Some(0));

    match &printed(&program.body[1]).kind {
        ExprKind::LValToRVal(inner) => match &inner.kind {
            ExprKind::Dot { index, .. } => assert_eq!(*index, Some(0)),
            other => panic!("expected dot expression, found {:?}", other),
        },
        other => panic!("expected load, found {:?}", other),
    }

    let by_index = printed(&program.body[2]);
    assert_eq!(by_index.ty, Some(int32));
    assert!(matches!(by_index.kind, ExprKind::Conversion(_)));
}

#[test]
fn test_identical_struct_literals_share_type() {
    let literal = || {
        Expr::glue(vec![
            GlueField::named("x", Expr::int(1)),
            GlueField::named("y", Expr::int(2)),
        ])
    };
    let program = Program::new(vec![
        VarDeclStmt::assignment("p", literal()),
        VarDeclStmt::assignment("p", literal()),
    ]);

    let (program, _) = check(program).unwrap();

    assert_eq!(initializer(&program.body[0]).ty, initializer(&program.body[1]).ty);
}

#[test]
fn test_field_errors() {
    let struct_literal = || Expr::glue(vec![GlueField::named("a", Expr::int(1)), GlueField::positional(Expr::int(2))]);

    let unknown_name = Program::new(vec![
        VarDeclStmt::assignment("p", struct_literal()),
        print(Expr::dot(Expr::id("p"), "b")),
    ]);
    let unknown_index = Program::new(vec![
        VarDeclStmt::assignment("p", struct_literal()),
        print(Expr::index(Expr::id("p"), 5)),
    ]);
    let not_a_struct = Program::new(vec![
        VarDeclStmt::assignment("x", Expr::int(1)),
        print(Expr::dot(Expr::id("x"), "a")),
    ]);
    let duplicate = Program::new(vec![VarDeclStmt::assignment(
        "p",
        Expr::glue(vec![GlueField::named("a", Expr::int(1)), GlueField::named("a", Expr::int(2))]),
    )]);

    assert_eq!(check(unknown_name).unwrap_err().get_error_name(), "UnknownField");
    assert_eq!(check(unknown_index).unwrap_err().get_error_name(), "UnknownField");
    assert_eq!(check(not_a_struct).unwrap_err().get_error_name(), "InvalidFieldAccess");
    assert_eq!(check(duplicate).unwrap_err().get_error_name(), "DuplicateField");
}

#[test]
fn test_struct_operands_rejected() {
    let program = Program::new(vec![
        VarDeclStmt::assignment("p", Expr::glue(vec![GlueField::named("a", Expr::int(1))])),
        print(Expr::binary("+", Expr::id("p"), Expr::int(1))),
    ]);

    let error = check(program).unwrap_err();

    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_bool_printed_as_int() {
    let program = Program::new(vec![
        VarDeclStmt::assignment("b", Expr::binary("<", Expr::int(1), Expr::int(2))),
        print(Expr::id("b")),
    ]);

    let (program, checker) = check(program).unwrap();

    let expected = "\
Program
  |-- Assignment [Name: b]
  |  |-- BinExpr [<] : bool
  |  |  |-- IntLit [1] : int(32)
  |  |  |-- IntLit [2] : int(32)
  |-- Output
  |  |-- Conversion : int(32)
  |  |  |-- LValToRVal : bool
  |  |  |  |-- Id [b] : bool
";

    assert_eq!(dump_program(&program, Some(&checker.types)), expected);
}

#[test]
fn test_typed_dump_of_narrow_variable() {
    let program = Program::new(vec![
        VarDeclStmt::declaration("x", Some(TypeSpec::Int(8)), Some(Expr::int(5))),
        print(Expr::id("x")),
    ]);

    let (program, checker) = check(program).unwrap();

    let expected = "\
Program
  |-- Declaration [Name: x]
  |  |-- TypeSpec [int(8)]
  |  |-- IntLit [5] : int(8)
  |-- Output
  |  |-- LValToRVal : int(8)
  |  |  |-- Id [x] : int(8)
";

    assert_eq!(dump_program(&program, Some(&checker.types)), expected);
    let (_, symbol) = checker.symbols.iter().next().unwrap();
    assert_eq!(checker.types.get(symbol.ty.unwrap()), &Type::Int(8));
}
