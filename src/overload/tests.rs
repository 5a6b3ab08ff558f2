use pretty_assertions::assert_eq;

use crate::{
    ast::{
        symbols::{Symbol, Var},
        types::{Signature, Tuple, Type},
    },
    builder::{code_builder::CodeBuilder, package::Package},
    overload::overload::split_overload_name,
    Config,
};

fn binary(ty: Type) -> Signature {
    Signature::new(
        Tuple::new(vec![Var::new("a", ty.clone()), Var::new("b", ty.clone())]),
        Tuple::from_types(vec![ty]),
        false,
    )
}

#[test]
fn test_split_overload_name() {
    assert_eq!(split_overload_name("add__0"), Some(("add", '0')));
    assert_eq!(split_overload_name("a__b__z"), Some(("a__b", 'z')));
    assert_eq!(split_overload_name("add__10"), None);
    assert_eq!(split_overload_name("__0"), None);
    assert_eq!(split_overload_name("add"), None);
}

#[test]
fn test_functions_grouped_in_index_order() {
    let mut pkg = Package::new("main");
    pkg.new_func(None, "add__1", binary(Type::string())).unwrap();
    pkg.new_func(None, "add__0", binary(Type::int())).unwrap();
    pkg.init_overloads().unwrap();

    let Some(Symbol::Overload(overload)) = pkg.scope.lookup("add") else {
        panic!("add is not an overload set");
    };
    let names: Vec<&str> = overload.variants().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["add__0", "add__1"]);
}

#[test]
fn test_call_resolves_first_matching_variant() {
    let mut pkg = Package::new("main");
    pkg.new_func(None, "add__0", binary(Type::int())).unwrap();
    pkg.new_func(None, "add__1", binary(Type::string())).unwrap();
    pkg.init_overloads().unwrap();

    let mut cb = CodeBuilder::new(pkg, Config::default());
    let add = cb.lookup("add").unwrap();

    cb.val(add.clone()).val("a").val("b").call(2, false).unwrap();
    let ret = cb.get(-1).cloned().unwrap();
    assert_eq!(ret.ty(), Type::string());
    assert_eq!(ret.value.to_string(), "add__1(\"a\", \"b\")");

    cb.val(add.clone()).val(1).val(2).call(2, false).unwrap();
    assert_eq!(cb.get(-1).unwrap().ty(), Type::int());

    cb.val(add).val(true).val(false);
    match cb.call(2, false) {
        Ok(_) => panic!("bool arguments should not match"),
        Err(error) => assert_eq!(error.get_error_name(), "NoMatchingOverload"),
    }
}

#[test]
fn test_overloaded_methods() {
    let mut pkg = Package::new("main");
    let vec2 = pkg.new_type("Vec2").unwrap();
    vec2.set_underlying(Type::structure(vec![]));
    let recv = Var::new("v", Type::Named(vec2.clone()));
    let scale = |ty: Type| {
        Signature::new(
            Tuple::new(vec![Var::new("k", ty)]),
            Tuple::from_types(vec![Type::Named(vec2.clone())]),
            false,
        )
    };
    pkg.new_func(Some(recv.clone()), "Scale__0", scale(Type::int()))
        .unwrap();
    pkg.new_func(Some(recv), "Scale__1", scale(Type::float64()))
        .unwrap();
    pkg.init_overloads().unwrap();

    let mut cb = CodeBuilder::new(pkg, Config::default());
    let v = cb.new_var(Type::Named(vec2.clone()), &["v"]).unwrap().remove(0);
    cb.val(&v).member_val("Scale").unwrap().val(1.5).call(1, false).unwrap();

    let ret = cb.get(-1).cloned().unwrap();
    assert_eq!(ret.ty(), Type::Named(vec2));
    assert_eq!(ret.value.to_string(), "v.Scale__1(1.5)");
}

#[test]
fn test_index_gap_is_rejected() {
    let mut pkg = Package::new("main");
    pkg.new_func(None, "f__0", binary(Type::int())).unwrap();
    pkg.new_func(None, "f__2", binary(Type::int())).unwrap();

    let error = pkg.init_overloads().unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidOverload");
}

#[test]
fn test_invalid_index_character() {
    let mut pkg = Package::new("main");
    pkg.new_func(None, "f__A", binary(Type::int())).unwrap();

    let error = pkg.init_overloads().unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidOverload");
}

#[test]
fn test_overload_name_must_be_free() {
    let mut pkg = Package::new("main");
    pkg.new_func(None, "g", binary(Type::int())).unwrap();
    pkg.new_func(None, "g__0", binary(Type::int())).unwrap();

    let error = pkg.init_overloads().unwrap_err();
    assert_eq!(error.get_error_name(), "AlreadyDeclared");
}
