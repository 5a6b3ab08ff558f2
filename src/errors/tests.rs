//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use pretty_assertions::assert_eq;

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::StackUnderflow {
            requested: 2,
            available: 1,
        },
        "BinaryOp",
    );

    assert_eq!(error.get_error_name(), "StackUnderflow");
    assert_eq!(error.get_operation(), "BinaryOp");
}

#[test]
fn test_error_display_includes_operation() {
    let error = Error::new(
        ErrorImpl::NotAssignable {
            value_type: "string".to_string(),
            target_type: "int".to_string(),
        },
        "Assign",
    );

    assert_eq!(error.to_string(), "Assign: cannot use string as int");
}

#[test]
fn test_cannot_infer_keeps_message_verbatim() {
    let error = Error::new(
        ErrorImpl::CannotInferTypeArgs {
            message: "cannot infer T".to_string(),
        },
        "Call",
    );

    assert_eq!(error.get_error_name(), "CannotInferTypeArgs");
    assert_eq!(error.get_error_impl().to_string(), "cannot infer T");
}

#[test]
fn test_member_not_found_error() {
    let error = Error::new(
        ErrorImpl::MemberNotFound {
            member: "x".to_string(),
            receiver: "Point".to_string(),
        },
        "MemberVal",
    );

    assert_eq!(error.get_error_name(), "MemberNotFound");
    assert_eq!(error.get_tip().to_string(), "`Point` has no field or method `x`");
}

#[test]
fn test_result_mismatch_error() {
    let error = Error::new(
        ErrorImpl::ResultMismatch {
            expected: "(int, string)".to_string(),
            received: "(int)".to_string(),
        },
        "Return",
    );

    assert_eq!(error.get_error_name(), "ResultMismatch");
}

#[test]
fn test_unsupported_error() {
    let error = Error::new(ErrorImpl::Unsupported { feature: "Defer" }, "Defer");

    assert_eq!(error.get_error_name(), "Unsupported");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            expected: 2,
            received: 1,
        },
        "Assign",
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
