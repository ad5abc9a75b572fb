use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::NameError { .. } => ErrorKind::NameError,
            ErrorImpl::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ErrorImpl::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
            ErrorImpl::MissingReturn { .. } => ErrorKind::MissingReturn,
            ErrorImpl::DefinitionOrderError { .. } => ErrorKind::DefinitionOrderError,
            ErrorImpl::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            ErrorImpl::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            ErrorImpl::UnboundLocal { .. } => ErrorKind::UnboundLocal,
            ErrorImpl::MalformedInstruction { .. } => ErrorKind::MalformedInstruction,
            ErrorImpl::StackUnderflow { .. } => ErrorKind::StackUnderflow,
            ErrorImpl::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            ErrorImpl::UndeclaredLocal { .. } => ErrorKind::UndeclaredLocal,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::NameError { .. } => "NameError",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::DuplicateDefinition { .. } => "DuplicateDefinition",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::DefinitionOrderError { .. } => "DefinitionOrderError",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::UnsupportedOperation { .. } => "UnsupportedOperation",
            ErrorImpl::UnboundLocal { .. } => "UnboundLocal",
            ErrorImpl::MalformedInstruction { .. } => "MalformedInstruction",
            ErrorImpl::StackUnderflow { .. } => "StackUnderflow",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::UndeclaredLocal { .. } => "UndeclaredLocal",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::NameError { name, reason } => {
                ErrorTip::Suggestion(format!("`{}` {}", name, reason))
            }
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::DuplicateDefinition { name } => ErrorTip::Suggestion(format!(
                "`{}` is already defined in this scope",
                name
            )),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Not every path through `{}` ends in a return statement",
                function
            )),
            ErrorImpl::DefinitionOrderError { name } => ErrorTip::Suggestion(format!(
                "Declaration of `{}` must come before any statement in its block",
                name
            )),
            ErrorImpl::ArityMismatch {
                callee,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                callee, expected, received
            )),
            ErrorImpl::UnsupportedOperation { operation } => ErrorTip::Suggestion(format!(
                "`{}` type checks but cannot be lowered to stack instructions yet",
                operation
            )),
            ErrorImpl::UnboundLocal { .. } => ErrorTip::None,
            ErrorImpl::MalformedInstruction { line } => {
                ErrorTip::Suggestion(format!("Could not read instruction `{}`", line))
            }
            ErrorImpl::StackUnderflow { .. } => ErrorTip::None,
            ErrorImpl::UnknownFunction { name } => {
                ErrorTip::Suggestion(format!("No host function `{}` is linked", name))
            }
            ErrorImpl::UndeclaredLocal { name } => ErrorTip::Suggestion(format!(
                "Local `{}` is used before its `local-declare`",
                name
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

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

/// Fieldless mirror of [`ErrorImpl`], for matching on what went wrong without the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NameError,
    TypeMismatch,
    DuplicateDefinition,
    MissingReturn,
    DefinitionOrderError,
    ArityMismatch,
    UnsupportedOperation,
    UnboundLocal,
    MalformedInstruction,
    StackUnderflow,
    UnknownFunction,
    UndeclaredLocal,
}

/// Why a name failed to resolve to something usable.
#[derive(Debug, Clone, PartialEq)]
pub enum NameErrorReason {
    NotDefined,
    NotAVariable,
    NotAFunction,
    NotAClass,
    NoSuchField { class: String },
    NoSuchMethod { class: String },
    NotAssignable,
}

impl Display for NameErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameErrorReason::NotDefined => write!(f, "is not defined"),
            NameErrorReason::NotAVariable => write!(f, "is not a variable"),
            NameErrorReason::NotAFunction => write!(f, "is not a function"),
            NameErrorReason::NotAClass => write!(f, "is not a class"),
            NameErrorReason::NoSuchField { class } => {
                write!(f, "is not a field of class `{}`", class)
            }
            NameErrorReason::NoSuchMethod { class } => {
                write!(f, "is not a method of class `{}`", class)
            }
            NameErrorReason::NotAssignable => write!(f, "cannot be assigned to"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("name error: {name:?} {reason}")]
    NameError { name: String, reason: NameErrorReason },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMismatch { expected: String, received: String },
    #[error("{name:?} already defined in this scope")]
    DuplicateDefinition { name: String },
    #[error("function {function:?} is missing a return on some path")]
    MissingReturn { function: String },
    #[error("declaration of {name:?} follows a non-declaration statement")]
    DefinitionOrderError { name: String },
    #[error("{callee:?} expects {expected:?} arguments, received {received:?}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        received: usize,
    },
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },
    #[error("no local slot allocated for {name:?}")]
    UnboundLocal { name: String },
    #[error("malformed instruction: {line:?}")]
    MalformedInstruction { line: String },
    #[error("operand stack underflow at {instruction}")]
    StackUnderflow { instruction: String },
    #[error("unknown host function {name:?}")]
    UnknownFunction { name: String },
    #[error("local {name:?} was never declared")]
    UndeclaredLocal { name: String },
}
