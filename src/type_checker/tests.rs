//! Unit tests for the built-in type oracle.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Expr, LitKind},
        symbols::{Func, Scope, Symbol, Var},
        types::{BasicKind, InterfaceType, Named, Signature, Tuple, Type, TypeParam},
    },
    type_checker::{
        operand::{Operand, OperandMode},
        oracle::{InferRequest, TypeOracle},
        type_checker::TypeChecker,
        universe::{new_universe, universe_error},
    },
};

fn untyped(kind: BasicKind, text: &str) -> Operand {
    Operand::new(Expr::lit(LitKind::Int, text), Type::Basic(kind), OperandMode::Constant)
}

fn var(name: &str, ty: Type) -> Operand {
    Operand::new(Expr::ident(name), ty, OperandMode::Variable)
}

fn any_constraint() -> Type {
    Type::empty_interface()
}

#[test]
fn test_untyped_assignability() {
    let checker = TypeChecker::new();
    let untyped_int = Type::Basic(BasicKind::UntypedInt);
    let untyped_float = Type::Basic(BasicKind::UntypedFloat);
    let untyped_nil = Type::Basic(BasicKind::UntypedNil);

    assert!(checker.assignable(&untyped_int, &Type::float64()));
    assert!(checker.assignable(&untyped_float, &Type::float64()));
    assert!(!checker.assignable(&untyped_float, &Type::int()));
    assert!(!checker.assignable(&untyped_int, &Type::string()));
    assert!(checker.assignable(&untyped_nil, &Type::slice(Type::int())));
    assert!(!checker.assignable(&untyped_nil, &Type::int()));
    assert!(checker.assignable(&untyped_int, &Type::empty_interface()));
}

#[test]
fn test_named_assignability() {
    let checker = TypeChecker::new();
    let celsius = Type::Named(Named::new("Celsius", Type::float64()));
    let ints = Type::Named(Named::new("Ints", Type::slice(Type::int())));

    assert!(!checker.assignable(&Type::float64(), &celsius));
    assert!(checker.assignable(&Type::slice(Type::int()), &ints));
    assert!(checker.assignable(&ints, &Type::slice(Type::int())));
    assert!(checker.convertible(&Type::float64(), &celsius));
}

#[test]
fn test_interface_assignability() {
    let checker = TypeChecker::new();
    let universe = new_universe();
    let error = universe_error(&universe);

    let my_err = Named::new("MyErr", Type::structure(vec![]));
    assert!(!checker.assignable(&Type::Named(my_err.clone()), &error));

    let sig = Signature::new(Tuple::default(), Tuple::from_types(vec![Type::string()]), false)
        .with_recv(Var::new("e", Type::Named(my_err.clone())));
    my_err.add_method(Func::new("Error", sig));

    assert!(checker.assignable(&Type::Named(my_err.clone()), &error));
    assert!(checker.assignable(&Type::pointer(Type::Named(my_err)), &error));
    assert!(checker.assignable(&Type::int(), &Type::empty_interface()));
}

#[test]
fn test_conversions() {
    let checker = TypeChecker::new();

    assert!(checker.convertible(&Type::int(), &Type::float64()));
    assert!(checker.convertible(&Type::int(), &Type::string()));
    assert!(checker.convertible(&Type::string(), &Type::slice(Type::Basic(BasicKind::Uint8))));
    assert!(!checker.convertible(&Type::string(), &Type::slice(Type::int())));
    assert!(!checker.convertible(&Type::bool(), &Type::int()));
}

#[test]
fn test_default_types() {
    let checker = TypeChecker::new();

    assert_eq!(checker.default_type(&Type::Basic(BasicKind::UntypedInt)), Type::int());
    assert_eq!(
        checker.default_type(&Type::Basic(BasicKind::UntypedRune)),
        Type::Basic(BasicKind::Int32)
    );
    assert_eq!(
        checker.default_type(&Type::Basic(BasicKind::UntypedFloat)),
        Type::float64()
    );
    assert_eq!(checker.default_type(&Type::string()), Type::string());
}

#[test]
fn test_infer_from_typed_argument() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let params = vec![Type::slice(Type::TypeParam(t.clone()))];
    let args = vec![var("xs", Type::slice(Type::string()))];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.inferred, vec![Type::string()]);
}

#[test]
fn test_infer_untyped_uses_largest_kind() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let params = vec![Type::TypeParam(t.clone()), Type::TypeParam(t.clone())];
    let args = vec![
        untyped(BasicKind::UntypedInt, "1"),
        untyped(BasicKind::UntypedFloat, "2.5"),
    ];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.inferred, vec![Type::float64()]);
}

#[test]
fn test_infer_typed_argument_wins_over_untyped() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let params = vec![Type::TypeParam(t.clone()), Type::TypeParam(t.clone())];
    let args = vec![
        untyped(BasicKind::UntypedInt, "1"),
        var("x", Type::Basic(BasicKind::Int64)),
    ];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert_eq!(outcome.inferred, vec![Type::Basic(BasicKind::Int64)]);
}

#[test]
fn test_infer_reports_conflict() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let params = vec![Type::TypeParam(t.clone()), Type::TypeParam(t.clone())];
    let args = vec![var("a", Type::int()), var("b", Type::string())];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert_eq!(
        outcome.diagnostics,
        vec!["type string of b does not match inferred type int for T".to_string()]
    );
}

#[test]
fn test_infer_reports_argument_count() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let params = vec![Type::TypeParam(t.clone())];
    let args = vec![var("a", Type::int()), var("s", Type::string())];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert_eq!(
        outcome.diagnostics,
        vec!["got 2 arguments but 1 parameters".to_string()]
    );
}

#[test]
fn test_infer_reports_unsolvable_param() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let u = TypeParam::new("U", any_constraint());
    let params = vec![Type::TypeParam(t.clone())];
    let args = vec![var("a", Type::int())];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t, u],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert_eq!(outcome.diagnostics, vec!["cannot infer U".to_string()]);
}

#[test]
fn test_infer_explicit_arguments_seed_the_solution() {
    let checker = TypeChecker::new();
    let t = TypeParam::new("T", any_constraint());
    let u = TypeParam::new("U", any_constraint());
    let params = vec![Type::TypeParam(t.clone())];
    let args = vec![var("a", Type::int())];
    let explicit = vec![Type::int(), Type::string()];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t, u],
        explicit: &explicit,
        params: &params,
        args: &args,
    });

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.inferred, vec![Type::int(), Type::string()]);
}

#[test]
fn test_infer_checks_constraints() {
    let checker = TypeChecker::new();
    let number = Type::Named(Named::new(
        "number",
        Type::Interface(Rc::new(InterfaceType::with_type_set(vec![
            Type::int(),
            Type::float64(),
        ]))),
    ));
    let t = TypeParam::new("T", number);
    let params = vec![Type::TypeParam(t.clone())];
    let args = vec![var("s", Type::string())];

    let outcome = checker.infer(&InferRequest {
        type_params: &[t],
        explicit: &[],
        params: &params,
        args: &args,
    });

    assert_eq!(
        outcome.diagnostics,
        vec!["string does not satisfy number".to_string()]
    );
}

#[test]
fn test_comparable_constraint() {
    let checker = TypeChecker::new();
    let comparable = Type::Interface(Rc::new(InterfaceType {
        comparable: true,
        ..Default::default()
    }));

    assert!(checker.satisfies(&Type::int(), &comparable));
    assert!(!checker.satisfies(&Type::slice(Type::int()), &comparable));
}

#[test]
fn test_universe_contents() {
    let universe = new_universe();

    assert!(matches!(universe.lookup("int"), Some(Symbol::TypeName(_))));
    assert!(matches!(universe.lookup("len"), Some(Symbol::Builtin(_))));
    assert!(matches!(universe.lookup("true"), Some(Symbol::Const(_))));
    assert!(universe.lookup("Op_Add").is_none());

    let pkg = Scope::new(Some(&universe), "main");
    assert!(pkg.lookup_parent("byte").is_some());
}
