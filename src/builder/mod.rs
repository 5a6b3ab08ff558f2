//! The stack-driven code builder.
//!
//! Callers drive construction by pushing operands and invoking operations
//! that consume them:
//!
//! - `CodeBuilder`: the operand stack, block contexts and statement emission
//! - `Package`: the package scope, declarations and name reservation
//! - Literals, calls, operators and value declarations, each in its own file

pub mod calls;
pub mod code_builder;
pub mod context;
pub mod decls;
pub mod literals;
pub mod operators;
pub mod package;
pub mod stack;
