//! The predeclared scope every package scope descends from.

use std::rc::Rc;

use lazy_static::lazy_static;

use crate::ast::{
    ast::{Expr, LitKind},
    symbols::{BuiltinFunc, Scope, Symbol},
    types::{BasicKind, InterfaceType, Named, Signature, Tuple, Type},
};

lazy_static! {
    static ref BASIC_TYPES: Vec<BasicKind> = vec![
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::String,
    ];
}

/// Creates a fresh universe scope.
///
/// Named types are reference counted per thread, so each package owns its
/// universe instead of sharing a global one.
pub fn new_universe() -> Scope {
    let universe = Scope::new(None, "universe");

    for kind in BASIC_TYPES.iter() {
        universe.insert(Symbol::new_type_name(kind.name(), Type::Basic(*kind)));
    }
    universe.insert(Symbol::new_type_name("byte", Type::Basic(BasicKind::Uint8)));
    universe.insert(Symbol::new_type_name("rune", Type::Basic(BasicKind::Int32)));
    universe.insert(Symbol::new_type_name("any", Type::empty_interface()));
    universe.insert(Symbol::new_type_name("error", error_type()));

    for value in ["true", "false"] {
        universe.insert(Symbol::new_const(
            value,
            Type::Basic(BasicKind::UntypedBool),
            Expr::ident(value),
        ));
    }

    for builtin in [
        BuiltinFunc::Len,
        BuiltinFunc::Cap,
        BuiltinFunc::Append,
        BuiltinFunc::New,
    ] {
        universe.insert(Symbol::Builtin(builtin));
    }

    universe
}

/// The type of the predeclared `error` in `universe`.
pub fn universe_error(universe: &Scope) -> Type {
    match universe.lookup("error") {
        Some(Symbol::TypeName(tn)) => tn.ty.clone(),
        _ => error_type(),
    }
}

fn error_type() -> Type {
    let error_method = Signature::new(
        Tuple::default(),
        Tuple::from_types(vec![Type::string()]),
        false,
    );
    Type::Named(Named::new(
        "error",
        Type::Interface(Rc::new(InterfaceType::with_methods(vec![(
            String::from("Error"),
            error_method,
        )]))),
    ))
}

/// The literal node for an untyped constant of kind `kind`.
pub fn untyped_literal(kind: LitKind, text: impl Into<String>) -> (Expr, Type) {
    let ty = match kind {
        LitKind::Int => BasicKind::UntypedInt,
        LitKind::Float => BasicKind::UntypedFloat,
        LitKind::Imag => BasicKind::UntypedComplex,
        LitKind::Char => BasicKind::UntypedRune,
        LitKind::String => BasicKind::UntypedString,
    };
    (Expr::lit(kind, text), Type::Basic(ty))
}
