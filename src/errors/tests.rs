//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};

#[test]
fn test_error_creation() {
    let error = Error::new(ErrorImpl::UnrecognisedToken {
        token: "@".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_syntax_error() {
    let error = Error::new(ErrorImpl::SyntaxError {
        token: "}".to_string(),
        message: "expected expression".to_string(),
    });

    assert_eq!(error.get_error_name(), "SyntaxError");
    assert_eq!(
        error.get_tip().to_string(),
        "Unexpected token: `}`, expected expression"
    );
}

#[test]
fn test_unresolved_name_error() {
    let error = Error::new(ErrorImpl::UnresolvedName {
        name: "foo".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnresolvedName");
    assert_eq!(error.to_string(), "unresolved name \"foo\"");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(ErrorImpl::TypeMismatch {
        expected: "int(8)".to_string(),
        received: "int(32)".to_string(),
    });

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(
        error.to_string(),
        "types do not match: expected int(8), received int(32)"
    );
}

#[test]
fn test_duplicate_declaration_error() {
    let error = Error::new(ErrorImpl::DuplicateDeclaration {
        name: "x".to_string(),
    });

    assert_eq!(error.get_error_name(), "DuplicateDeclaration");
}

#[test]
fn test_literal_out_of_range_error() {
    let error = Error::new(ErrorImpl::LiteralOutOfRange {
        value: "300".to_string(),
        ty: "int(8)".to_string(),
    });

    assert_eq!(error.get_error_name(), "LiteralOutOfRange");
    assert_eq!(
        error.get_tip().to_string(),
        "Literal `300` does not fit in `int(8)`"
    );
}

#[test]
fn test_field_errors() {
    let unknown = Error::new(ErrorImpl::UnknownField {
        field: "z".to_string(),
        ty: "struct{x: int(32)}".to_string(),
    });
    let invalid = Error::new(ErrorImpl::InvalidFieldAccess {
        ty: "int(32)".to_string(),
    });

    assert_eq!(unknown.get_error_name(), "UnknownField");
    assert_eq!(invalid.get_error_name(), "InvalidFieldAccess");
}

#[test]
fn test_lowering_error() {
    let error = Error::new(ErrorImpl::LoweringError {
        message: "for loop expects exactly two bounds, found 3".to_string(),
    });

    assert_eq!(error.get_error_name(), "LoweringError");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("found 3")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_from_impl() {
    let error: Error = ErrorImpl::UnknownOperator {
        operator: "%".to_string(),
    }
    .into();

    assert_eq!(error.get_error_name(), "UnknownOperator");
    assert!(matches!(
        error.get_internal(),
        ErrorImpl::UnknownOperator { .. }
    ));
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::UnrecognisedToken {
        token: "@".to_string(),
    });

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
