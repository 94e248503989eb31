use std::fmt::Display;

use inkwell::builder::BuilderError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
}

impl Error {
    pub fn new(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
        }
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::SyntaxError { .. } => "SyntaxError",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnresolvedName { .. } => "UnresolvedName",
            ErrorImpl::UnboundSymbolType { .. } => "UnboundSymbolType",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::DuplicateField { .. } => "DuplicateField",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::LiteralOutOfRange { .. } => "LiteralOutOfRange",
            ErrorImpl::InvalidWidth { .. } => "InvalidWidth",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::InvalidFieldAccess { .. } => "InvalidFieldAccess",
            ErrorImpl::LoweringError { .. } => "LoweringError",
            ErrorImpl::InternalVerificationFailure { .. } => "InternalVerificationFailure",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::SyntaxError { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnresolvedName { name } => {
                ErrorTip::Suggestion(format!("Variable `{}` is used before it is assigned", name))
            }
            ErrorImpl::UnboundSymbolType { name } => ErrorTip::Suggestion(format!(
                "Variable `{}` has no type yet, give it a value or a type annotation",
                name
            )),
            ErrorImpl::DuplicateDeclaration { name } => ErrorTip::Suggestion(format!(
                "Variable `{}` already has a type in this scope",
                name
            )),
            ErrorImpl::DuplicateField { field } => {
                ErrorTip::Suggestion(format!("Field `{}` is written twice", field))
            }
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::LiteralOutOfRange { value, ty } => ErrorTip::Suggestion(format!(
                "Literal `{}` does not fit in `{}`",
                value, ty
            )),
            ErrorImpl::InvalidWidth { width } => ErrorTip::Suggestion(format!(
                "Integer width must be at least 1, found {}",
                width
            )),
            ErrorImpl::UnknownOperator { operator } => {
                ErrorTip::Suggestion(format!("Operator `{}` is not supported", operator))
            }
            ErrorImpl::UnknownField { field, ty } => {
                ErrorTip::Suggestion(format!("Type `{}` has no field `{}`", ty, field))
            }
            ErrorImpl::InvalidFieldAccess { ty } => ErrorTip::Suggestion(format!(
                "Fields can only be accessed on structs, found `{}`",
                ty
            )),
            ErrorImpl::LoweringError { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::InternalVerificationFailure { .. } => ErrorTip::Suggestion(String::from(
                "The generated module is malformed, this is a compiler bug",
            )),
        }
    }
}

impl From<ErrorImpl> for Error {
    fn from(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl)
    }
}

impl From<BuilderError> for Error {
    fn from(error: BuilderError) -> Self {
        Error::new(ErrorImpl::LoweringError {
            message: error.to_string(),
        })
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("syntax error ({message}): {token:?}")]
    SyntaxError { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unresolved name {name:?}")]
    UnresolvedName { name: String },
    #[error("symbol {name:?} has no type")]
    UnboundSymbolType { name: String },
    #[error("variable {name:?} already declared with a type")]
    DuplicateDeclaration { name: String },
    #[error("field {field:?} written twice in struct literal")]
    DuplicateField { field: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("literal {value} does not fit in {ty}")]
    LiteralOutOfRange { value: String, ty: String },
    #[error("invalid integer width {width}")]
    InvalidWidth { width: u32 },
    #[error("unknown operator {operator:?}")]
    UnknownOperator { operator: String },
    #[error("unknown field {field:?} on {ty}")]
    UnknownField { field: String, ty: String },
    #[error("field access on non-struct type {ty}")]
    InvalidFieldAccess { ty: String },
    #[error("lowering error: {message}")]
    LoweringError { message: String },
    #[error("module verification failed: {message}")]
    InternalVerificationFailure { message: String },
}
