use crate::ast::{
    ast::Expr,
    types::{AutoType, Type},
};

/// Classification of an operand, governing how it may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandMode {
    Invalid,
    /// Result of a call with no results.
    NoValue,
    Builtin,
    TypeExpr,
    Constant,
    /// Addressable variable.
    Variable,
    /// `m[k]`: assignable, and yields `(v, ok)` in a two-value context.
    MapIndex,
    Value,
    Nil,
    CommaOk,
    CommaErr,
    CgoFunc,
}

impl OperandMode {
    /// Whether an operand in this mode denotes a value.
    pub fn is_value(self) -> bool {
        !matches!(
            self,
            OperandMode::Invalid | OperandMode::NoValue | OperandMode::Builtin | OperandMode::TypeExpr
        )
    }

    /// Whether an operand in this mode may be assigned to.
    pub fn is_assignable_target(self) -> bool {
        matches!(self, OperandMode::Variable | OperandMode::MapIndex)
    }
}

/// A value/type/mode triple flowing through construction operations.
#[derive(Debug, Clone)]
pub struct Operand {
    pub value: Expr,
    pub ty: Option<Type>,
    pub mode: OperandMode,
    /// Set when the operand refers to an auto variable whose type may still
    /// be unknown.
    pub auto: Option<AutoType>,
}

impl Operand {
    pub fn new(value: Expr, ty: Type, mode: OperandMode) -> Self {
        Operand {
            value,
            ty: Some(ty),
            mode,
            auto: None,
        }
    }

    /// The blank identifier. Anything may be assigned to it.
    pub fn discard() -> Self {
        Operand {
            value: Expr::ident("_"),
            ty: None,
            mode: OperandMode::Variable,
            auto: None,
        }
    }

    pub fn is_discard(&self) -> bool {
        self.ty.is_none() && self.auto.is_none() && self.value == Expr::ident("_")
    }

    /// The operand's type, or the invalid type when it has none.
    pub fn ty(&self) -> Type {
        match (&self.ty, &self.auto) {
            (Some(ty), _) => ty.clone(),
            (None, Some(auto)) => auto.get().unwrap_or_else(Type::invalid),
            (None, None) => Type::invalid(),
        }
    }

    pub fn is_untyped(&self) -> bool {
        self.ty.as_ref().is_some_and(Type::is_untyped)
    }
}
