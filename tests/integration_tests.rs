//! Integration tests for end-to-end tree construction.
//!
//! These tests drive the builder through its public API the way a front end
//! would: declare a package, open function bodies, push operands and emit
//! statements, then inspect the resulting declarations.

use codebuilder::{
    ast::{
        ast::Decl,
        symbols::{Symbol, Var},
        types::{Field, Signature, Tuple, Type, TypeParam},
    },
    builder::{
        code_builder::{RefTarget, Value},
        operators::BinaryOperator,
    },
    CodeBuilder, Config, Package,
};
use pretty_assertions::assert_eq;

fn body_lines(func: &codebuilder::ast::symbols::Func) -> Vec<String> {
    func.body()
        .as_ref()
        .map(|stmts| stmts.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn test_build_function_body() {
    let mut pkg = Package::new("main");
    let sig = Signature::new(
        Tuple::new(vec![Var::new("a", Type::int()), Var::new("b", Type::int())]),
        Tuple::from_types(vec![Type::int()]),
        false,
    );
    let add = pkg.new_func(None, "add", sig).unwrap();
    let mut cb = CodeBuilder::new(pkg, Config::default());

    cb.func_body(&add);
    let a = cb.lookup("a").unwrap();
    let b = cb.lookup("b").unwrap();
    cb.define_var_start(&["c"]).unwrap();
    cb.val(a)
        .val(b)
        .binary_op(BinaryOperator::Add)
        .unwrap()
        .end_init(1)
        .unwrap();
    let c = cb.lookup("c").unwrap();
    assert_eq!(c.ty(), Some(Type::int()));
    cb.val(c).return_(1).unwrap();
    cb.end();

    assert_eq!(body_lines(&add), vec!["c := Op_Add(a, b)", "return c"]);
    assert_eq!(cb.stack_len(), 0);
}

#[test]
fn test_package_declarations_keep_order() {
    let mut cb = CodeBuilder::new(Package::new("main"), Config::default());
    cb.new_var_start(None, &["limit"]).unwrap();
    cb.val(10).end_init(1).unwrap();
    let main = cb
        .pkg_mut()
        .new_func(None, "main", Signature::default())
        .unwrap();
    cb.new_const_start(Some(Type::string()), &["greeting"])
        .unwrap();
    cb.val("hi").end_init(1).unwrap();

    let decls: Vec<String> = cb
        .pkg()
        .decls()
        .iter()
        .map(|decl| match decl {
            Decl::Func(func) => format!("func {}", func.name()),
            Decl::Value(spec) => spec.to_string(),
        })
        .collect();
    assert_eq!(
        decls,
        vec![
            "var limit = 10".to_string(),
            "func main".to_string(),
            "const greeting string = \"hi\"".to_string(),
        ]
    );
    assert!(main.body().is_none());
}

#[test]
fn test_nested_composite_literals() {
    let mut cb = CodeBuilder::new(Package::new("main"), Config::default());
    cb.define_var_start(&["m"]).unwrap();
    cb.val("a")
        .val(1)
        .val(2)
        .slice_lit(None, 2)
        .unwrap()
        .val("b")
        .val(3)
        .slice_lit(None, 1)
        .unwrap()
        .map_lit(None, 4)
        .unwrap()
        .end_init(1)
        .unwrap();

    let m = cb.lookup("m").unwrap();
    assert_eq!(
        m.ty(),
        Some(Type::map(Type::string(), Type::slice(Type::int())))
    );
}

#[test]
fn test_failed_operation_leaves_builder_usable() {
    let mut cb = CodeBuilder::new(Package::new("main"), Config::default());
    let x = cb.new_var(Type::int(), &["x"]).unwrap().remove(0);

    cb.var_ref(Some(RefTarget::Var(x.clone()))).val("oops");
    let error = match cb.assign(1, 1) {
        Ok(_) => panic!("assigning a string to an int should fail"),
        Err(error) => error,
    };
    assert_eq!(error.to_string(), "Assign: cannot use untyped string as int");
    assert_eq!(error.get_operation(), "Assign");
    assert_eq!(cb.stack_len(), 2);

    cb.pop();
    cb.val(42).assign(1, 1).unwrap();
    assert_eq!(cb.stmts().len(), 1);
    assert_eq!(cb.stmts()[0].to_string(), "x = 42");
}

#[test]
fn test_generic_function_with_struct_results() {
    let mut pkg = Package::new("main");
    let pair = pkg.new_type("Pair").unwrap();
    pair.set_underlying(Type::structure(vec![
        Field::new("key", Type::string()),
        Field::new("value", Type::int()),
    ]));

    let t = TypeParam::new("T", Type::empty_interface());
    let first = pkg
        .new_func(
            None,
            "first",
            Signature::new(
                Tuple::new(vec![Var::new("xs", Type::slice(Type::TypeParam(t.clone())))]),
                Tuple::from_types(vec![Type::TypeParam(t.clone())]),
                false,
            )
            .with_type_params(vec![t]),
        )
        .unwrap();

    let mut cb = CodeBuilder::new(pkg, Config::default());
    let pairs = cb
        .new_var(Type::slice(Type::Named(pair.clone())), &["pairs"])
        .unwrap()
        .remove(0);

    cb.define_var_start(&["k"]).unwrap();
    cb.val(&first)
        .val(&pairs)
        .call(1, false)
        .unwrap()
        .member_val("key")
        .unwrap()
        .end_init(1)
        .unwrap();

    assert_eq!(cb.lookup("k").and_then(|s| s.ty()), Some(Type::string()));
    assert_eq!(cb.pkg().decls().len(), 3);
}

#[test]
fn test_generated_names_avoid_collisions() {
    let mut cb = CodeBuilder::new(Package::new("main"), Config::default());
    let (name, renamed) = cb.pkg_mut().require_name("result");
    assert_eq!((name.as_str(), renamed), ("result", false));

    let v = cb.new_auto_var(&name);
    cb.var_ref(Some(RefTarget::Auto(v.clone())))
        .val(1.5)
        .assign(1, 1)
        .unwrap();
    assert_eq!(v.ty(), Some(Type::float64()));
    assert_eq!(cb.stmts()[0].to_string(), "var result float64");

    let (again, renamed) = cb.pkg_mut().require_name("result");
    assert_eq!((again.as_str(), renamed), ("result1", true));
}

#[test]
fn test_debug_tracing_does_not_change_results() {
    let config = Config {
        debug: true,
        ..Config::default()
    };
    let mut cb = CodeBuilder::new(Package::new("main"), config);
    cb.val(Value::Nil);
    cb.val(2).val(3).binary_op(BinaryOperator::Mul).unwrap();

    assert_eq!(cb.stack_len(), 2);
    match cb.lookup("len") {
        Some(Symbol::Builtin(builtin)) => assert_eq!(builtin.name(), "len"),
        other => panic!("unexpected symbol {:?}", other),
    }
}
