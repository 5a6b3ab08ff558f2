use std::fmt::Display;

use thiserror::Error;

/// An error raised by a construction operation.
///
/// Trees are built programmatically, so instead of a source position the
/// error remembers which operation rejected its input.
#[derive(Error, Debug, Clone)]
#[error("{operation}: {internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    operation: &'static str,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, operation: &'static str) -> Self {
        Error {
            internal_error: error_impl,
            operation,
        }
    }

    pub fn get_operation(&self) -> &'static str {
        self.operation
    }

    pub fn get_error_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::StackUnderflow { .. } => "StackUnderflow",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::ResultMismatch { .. } => "ResultMismatch",
            ErrorImpl::NotAssignable { .. } => "NotAssignable",
            ErrorImpl::MismatchedElementTypes { .. } => "MismatchedElementTypes",
            ErrorImpl::MemberNotFound { .. } => "MemberNotFound",
            ErrorImpl::OperatorNotSupported { .. } => "OperatorNotSupported",
            ErrorImpl::CannotInferTypeArgs { .. } => "CannotInferTypeArgs",
            ErrorImpl::NotAValue { .. } => "NotAValue",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::CannotAssignTo { .. } => "CannotAssignTo",
            ErrorImpl::CannotConvert { .. } => "CannotConvert",
            ErrorImpl::CannotSpread { .. } => "CannotSpread",
            ErrorImpl::InvalidArgument { .. } => "InvalidArgument",
            ErrorImpl::InvalidCompositeType { .. } => "InvalidCompositeType",
            ErrorImpl::NotIndexable { .. } => "NotIndexable",
            ErrorImpl::NoMatchingOverload { .. } => "NoMatchingOverload",
            ErrorImpl::NotConstant { .. } => "NotConstant",
            ErrorImpl::UseOfUntypedNil => "UseOfUntypedNil",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::UnexpectedOperands { .. } => "UnexpectedOperands",
            ErrorImpl::NoPendingDeclaration => "NoPendingDeclaration",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::InvalidIdentifier { .. } => "InvalidIdentifier",
            ErrorImpl::InvalidOverload { .. } => "InvalidOverload",
            ErrorImpl::Unsupported { .. } => "Unsupported",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::StackUnderflow { requested, available } => ErrorTip::Suggestion(format!(
                "Operation needs {} operands but only {} are above the block base",
                requested, available
            )),
            ErrorImpl::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} operands, received {}",
                expected, received
            )),
            ErrorImpl::ResultMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Function returns `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::NotAssignable {
                value_type,
                target_type,
            } => ErrorTip::Suggestion(format!(
                "Cannot use a value of type `{}` as `{}`",
                value_type, target_type
            )),
            ErrorImpl::MismatchedElementTypes { first, second } => ErrorTip::Suggestion(format!(
                "Elements of type `{}` and `{}` have no common type, give the literal an explicit type",
                first, second
            )),
            ErrorImpl::MemberNotFound { member, receiver } => ErrorTip::Suggestion(format!(
                "`{}` has no field or method `{}`",
                receiver, member
            )),
            ErrorImpl::OperatorNotSupported { operator } => ErrorTip::Suggestion(format!(
                "No callable named `{}` is registered",
                operator
            )),
            ErrorImpl::CannotInferTypeArgs { .. } => ErrorTip::Suggestion(String::from(
                "Pass the type arguments explicitly",
            )),
            ErrorImpl::NotAValue { expr } => {
                ErrorTip::Suggestion(format!("`{}` is not used as a value", expr))
            }
            ErrorImpl::NotCallable { expr } => {
                ErrorTip::Suggestion(format!("`{}` cannot be called", expr))
            }
            ErrorImpl::CannotAssignTo { expr } => {
                ErrorTip::Suggestion(format!("`{}` is not addressable", expr))
            }
            ErrorImpl::CannotConvert {
                value_type,
                target_type,
            } => ErrorTip::Suggestion(format!(
                "Cannot convert `{}` to `{}`",
                value_type, target_type
            )),
            ErrorImpl::CannotSpread { callee } => {
                ErrorTip::Suggestion(format!("`{}` is not variadic", callee))
            }
            ErrorImpl::InvalidArgument { func, ty } => ErrorTip::Suggestion(format!(
                "Invalid argument of type `{}` for `{}`",
                ty, func
            )),
            ErrorImpl::InvalidCompositeType { ty, expected } => ErrorTip::Suggestion(format!(
                "Expected a {} type, found `{}`",
                expected, ty
            )),
            ErrorImpl::NotIndexable { ty } => {
                ErrorTip::Suggestion(format!("Values of type `{}` cannot be indexed", ty))
            }
            ErrorImpl::NoMatchingOverload { name } => {
                ErrorTip::Suggestion(format!("No variant of `{}` accepts these arguments", name))
            }
            ErrorImpl::NotConstant { expr } => {
                ErrorTip::Suggestion(format!("`{}` is not a constant", expr))
            }
            ErrorImpl::UseOfUntypedNil => ErrorTip::Suggestion(String::from(
                "Give the declaration an explicit type",
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::None,
            ErrorImpl::UnexpectedOperands { count } => ErrorTip::Suggestion(format!(
                "{} operands left on the stack, expected an assignment",
                count
            )),
            ErrorImpl::NoPendingDeclaration => ErrorTip::Suggestion(String::from(
                "Start a declaration before ending its initializer",
            )),
            ErrorImpl::AlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::InvalidIdentifier { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a valid identifier", name))
            }
            ErrorImpl::InvalidOverload { name, reason } => {
                ErrorTip::Suggestion(format!("Overload `{}`: {}", name, reason))
            }
            ErrorImpl::Unsupported { .. } => ErrorTip::None,
        }
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
    #[error("stack underflow: requested {requested}, available {available}")]
    StackUnderflow { requested: usize, available: usize },
    #[error("arity mismatch: expected {expected}, received {received}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("result mismatch: expected {expected}, received {received}")]
    ResultMismatch { expected: String, received: String },
    #[error("cannot use {value_type} as {target_type}")]
    NotAssignable {
        value_type: String,
        target_type: String,
    },
    #[error("mismatched element types {first} and {second}")]
    MismatchedElementTypes { first: String, second: String },
    #[error("{receiver} has no field or method {member}")]
    MemberNotFound { member: String, receiver: String },
    #[error("operator {operator} not supported")]
    OperatorNotSupported { operator: String },
    #[error("{message}")]
    CannotInferTypeArgs { message: String },
    #[error("{expr} is not a value")]
    NotAValue { expr: String },
    #[error("cannot call non-function {expr}")]
    NotCallable { expr: String },
    #[error("cannot assign to {expr}")]
    CannotAssignTo { expr: String },
    #[error("cannot convert {value_type} to {target_type}")]
    CannotConvert {
        value_type: String,
        target_type: String,
    },
    #[error("cannot use ... in call to non-variadic {callee}")]
    CannotSpread { callee: String },
    #[error("invalid argument of type {ty} for {func}")]
    InvalidArgument { func: String, ty: String },
    #[error("invalid composite literal type {ty}: expected {expected}")]
    InvalidCompositeType { ty: String, expected: &'static str },
    #[error("cannot index {ty}")]
    NotIndexable { ty: String },
    #[error("no matching overload for {name}")]
    NoMatchingOverload { name: String },
    #[error("{expr} is not constant")]
    NotConstant { expr: String },
    #[error("use of untyped nil")]
    UseOfUntypedNil,
    #[error("return outside of function body")]
    ReturnOutsideFunction,
    #[error("{count} unconsumed operands at end of statement")]
    UnexpectedOperands { count: usize },
    #[error("no pending declaration")]
    NoPendingDeclaration,
    #[error("{name} already declared")]
    AlreadyDeclared { name: String },
    #[error("invalid identifier {name:?}")]
    InvalidIdentifier { name: String },
    #[error("invalid overload {name}: {reason}")]
    InvalidOverload { name: String, reason: String },
    #[error("{feature} is not supported")]
    Unsupported { feature: &'static str },
}
