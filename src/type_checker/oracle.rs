use crate::ast::types::{Type, TypeParam};

use super::operand::Operand;

/// An argument-directed type inference request for a generic callee.
#[derive(Debug)]
pub struct InferRequest<'a> {
    pub type_params: &'a [TypeParam],
    /// Leading explicitly supplied type arguments.
    pub explicit: &'a [Type],
    /// Declared parameter types, one per argument (variadic tails expanded).
    pub params: &'a [Type],
    pub args: &'a [Operand],
}

/// Result of an inference request. `inferred` is complete only when
/// `diagnostics` is empty.
#[derive(Debug, Default)]
pub struct InferOutcome {
    pub inferred: Vec<Type>,
    pub diagnostics: Vec<String>,
}

/// The type system consulted by the builder.
pub trait TypeOracle {
    /// Whether a value of type `value` may be assigned to a `target`.
    fn assignable(&self, value: &Type, target: &Type) -> bool;

    /// Whether a value of type `value` may be converted to `target`.
    fn convertible(&self, value: &Type, target: &Type) -> bool;

    /// The type an untyped constant takes when no other type is implied.
    /// Typed types are returned unchanged.
    fn default_type(&self, ty: &Type) -> Type;

    fn infer(&self, request: &InferRequest) -> InferOutcome;
}
