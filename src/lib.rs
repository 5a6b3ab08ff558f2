#![allow(clippy::module_inception)]

pub mod ast;
pub mod builder;
pub mod errors;
pub mod macros;
pub mod overload;
pub mod type_checker;

extern crate regex;

pub use builder::{code_builder::CodeBuilder, package::Package};
pub use errors::errors::{Error, ErrorImpl, ErrorTip};

/// Per-builder settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Emit `tracing` debug events for every construction operation.
    pub debug: bool,
    /// Prefix joined to an operator name (`Add`, `Neg`, ...) to find the
    /// callable implementing it.
    pub operator_prefix: String,
    /// Prefix of generated variable names.
    pub auto_prefix: String,
    /// Populate the operator scope with the default generic operators.
    pub register_operators: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            operator_prefix: String::from("Op_"),
            auto_prefix: String::from("_auto_"),
            register_operators: true,
        }
    }
}
