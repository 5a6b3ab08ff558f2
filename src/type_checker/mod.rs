//! Type checking services consulted by the code builder.
//!
//! This module holds everything the builder needs to validate operations:
//!
//! - The operand representation (value, type and mode)
//! - The `TypeOracle` trait the builder is written against
//! - `TypeChecker`, the built-in oracle (assignability, conversion,
//!   default typing and generic type argument inference)
//! - The universe scope of predeclared names

pub mod operand;
pub mod oracle;
pub mod type_checker;
pub mod universe;

#[cfg(test)]
mod tests;
