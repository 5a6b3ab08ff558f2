//! Symbols and lexical scopes.

use std::{
    cell::{Ref, RefCell},
    collections::BTreeMap,
    fmt::{self, Debug},
    rc::{Rc, Weak},
};

use super::{
    ast::{Expr, Stmt},
    types::{Signature, Type},
};

#[derive(Debug)]
struct VarData {
    name: String,
    ty: Type,
}

/// A variable: locals, parameters, results and package globals.
#[derive(Debug, Clone)]
pub struct Var(Rc<VarData>);

impl Var {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Var(Rc::new(VarData {
            name: name.into(),
            ty,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    pub fn same(&self, other: &Var) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone)]
pub struct Const {
    pub name: String,
    pub ty: Type,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct TypeName {
    pub name: String,
    pub ty: Type,
}

struct FuncData {
    name: String,
    sig: Rc<Signature>,
    body: RefCell<Option<Vec<Stmt>>>,
}

/// A declared function or method.
#[derive(Clone)]
pub struct Func(Rc<FuncData>);

impl Func {
    pub fn new(name: impl Into<String>, sig: Signature) -> Self {
        Func(Rc::new(FuncData {
            name: name.into(),
            sig: Rc::new(sig),
            body: RefCell::new(None),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn signature(&self) -> &Rc<Signature> {
        &self.0.sig
    }

    pub fn ty(&self) -> Type {
        Type::Signature(Rc::clone(&self.0.sig))
    }

    pub fn body(&self) -> Ref<'_, Option<Vec<Stmt>>> {
        self.0.body.borrow()
    }

    pub fn set_body(&self, body: Vec<Stmt>) {
        *self.0.body.borrow_mut() = Some(body);
    }

    pub fn same(&self, other: &Func) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({}{})", self.0.name, self.0.sig)
    }
}

#[derive(Debug)]
struct OverloadData {
    name: String,
    variants: Vec<Func>,
}

/// A callable with several variants, tried in order.
#[derive(Debug, Clone)]
pub struct OverloadFunc(Rc<OverloadData>);

impl OverloadFunc {
    pub fn new(name: impl Into<String>, variants: Vec<Func>) -> Self {
        OverloadFunc(Rc::new(OverloadData {
            name: name.into(),
            variants,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn variants(&self) -> &[Func] {
        &self.0.variants
    }

    pub fn ty(&self) -> Type {
        Type::Overload(self.clone())
    }
}

impl PartialEq for OverloadFunc {
    fn eq(&self, other: &OverloadFunc) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunc {
    Len,
    Cap,
    Append,
    New,
}

impl BuiltinFunc {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinFunc::Len => "len",
            BuiltinFunc::Cap => "cap",
            BuiltinFunc::Append => "append",
            BuiltinFunc::New => "new",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Var(Var),
    Const(Rc<Const>),
    TypeName(Rc<TypeName>),
    Func(Func),
    Overload(OverloadFunc),
    Builtin(BuiltinFunc),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Var(var) => var.name(),
            Symbol::Const(c) => &c.name,
            Symbol::TypeName(tn) => &tn.name,
            Symbol::Func(func) => func.name(),
            Symbol::Overload(overload) => overload.name(),
            Symbol::Builtin(builtin) => builtin.name(),
        }
    }

    /// The symbol's type. Builtins have none.
    pub fn ty(&self) -> Option<Type> {
        match self {
            Symbol::Var(var) => Some(var.ty().clone()),
            Symbol::Const(c) => Some(c.ty.clone()),
            Symbol::TypeName(tn) => Some(tn.ty.clone()),
            Symbol::Func(func) => Some(func.ty()),
            Symbol::Overload(overload) => Some(overload.ty()),
            Symbol::Builtin(_) => None,
        }
    }

    pub fn new_const(name: impl Into<String>, ty: Type, value: Expr) -> Self {
        Symbol::Const(Rc::new(Const {
            name: name.into(),
            ty,
            value,
        }))
    }

    pub fn new_type_name(name: impl Into<String>, ty: Type) -> Self {
        Symbol::TypeName(Rc::new(TypeName {
            name: name.into(),
            ty,
        }))
    }
}

struct ScopeData {
    parent: Option<Weak<ScopeData>>,
    label: String,
    elems: RefCell<BTreeMap<String, Symbol>>,
    children: RefCell<Vec<Scope>>,
}

/// A lexical scope. Parents own their children, children hold a weak
/// link back to their parent.
#[derive(Clone)]
pub struct Scope(Rc<ScopeData>);

impl Scope {
    pub fn new(parent: Option<&Scope>, label: impl Into<String>) -> Self {
        let scope = Scope(Rc::new(ScopeData {
            parent: parent.map(|p| Rc::downgrade(&p.0)),
            label: label.into(),
            elems: RefCell::new(BTreeMap::new()),
            children: RefCell::new(vec![]),
        }));

        if let Some(parent) = parent {
            parent.0.children.borrow_mut().push(scope.clone());
        }

        scope
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn parent(&self) -> Option<Scope> {
        self.0.parent.as_ref().and_then(Weak::upgrade).map(Scope)
    }

    pub fn children(&self) -> Vec<Scope> {
        self.0.children.borrow().clone()
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.0.elems.borrow().get(name).cloned()
    }

    /// Walks the parent chain and returns the innermost match.
    pub fn lookup_parent(&self, name: &str) -> Option<(Scope, Symbol)> {
        let mut scope = Some(self.clone());
        while let Some(current) = scope {
            if let Some(symbol) = current.lookup(name) {
                return Some((current, symbol));
            }
            scope = current.parent();
        }
        None
    }

    /// Inserts `symbol` unless its name is taken, in which case the
    /// existing symbol is returned and the scope is left unchanged.
    pub fn insert(&self, symbol: Symbol) -> Option<Symbol> {
        let mut elems = self.0.elems.borrow_mut();
        if let Some(existing) = elems.get(symbol.name()) {
            return Some(existing.clone());
        }
        elems.insert(symbol.name().to_string(), symbol);
        None
    }

    /// Names declared directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        self.0.elems.borrow().keys().cloned().collect()
    }

    /// Whether `name` is declared in this scope or any descendant.
    pub fn has_name_deep(&self, name: &str) -> bool {
        self.0.elems.borrow().contains_key(name)
            || self
                .0
                .children
                .borrow()
                .iter()
                .any(|child| child.has_name_deep(name))
    }

    pub fn same(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({:?}, {:?})", self.0.label, self.names())
    }
}
