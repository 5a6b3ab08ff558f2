//! Error types and error handling for the code builder.
//!
//! This module defines the error types returned by every construction
//! operation. It includes:
//!
//! - An error structure recording the operation that failed
//! - Specific error variants for stack, shape, typing and resolution failures
//! - Error formatting and suggestion tips

pub mod errors;

#[cfg(test)]
mod tests;
