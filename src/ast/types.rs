//! Type descriptors for the target language.
//!
//! This module defines the type system the builder checks against:
//!
//! - Basic types, including the untyped constant kinds
//! - Composite types (pointers, slices, arrays, maps, structs)
//! - Named types with methods, and function signatures
//! - Tuples for multi-value results
//! - Interfaces and type parameters for generic callees
//!
//! Equality on [`Type`] is type identity: named types and type parameters
//! compare by identity, everything else structurally.

use std::{
    cell::{Ref, RefCell},
    fmt::{self, Debug, Display},
    rc::Rc,
};

use super::symbols::{Func, OverloadFunc, Symbol, Var};

/// Represents the predeclared basic kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Invalid,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Invalid => "invalid type",
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedComplex => "untyped complex",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
                | BasicKind::UntypedFloat
                | BasicKind::UntypedComplex
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BasicKind::Bool | BasicKind::UntypedBool)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            BasicKind::Float32 | BasicKind::Float64 | BasicKind::UntypedFloat
        )
    }

    pub fn is_complex(self) -> bool {
        matches!(
            self,
            BasicKind::Complex64 | BasicKind::Complex128 | BasicKind::UntypedComplex
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }

    pub fn is_string(self) -> bool {
        matches!(self, BasicKind::String | BasicKind::UntypedString)
    }

    /// Ordering of the untyped numeric kinds, used to join mixed constants.
    pub fn untyped_rank(self) -> Option<u8> {
        match self {
            BasicKind::UntypedInt => Some(0),
            BasicKind::UntypedRune => Some(1),
            BasicKind::UntypedFloat => Some(2),
            BasicKind::UntypedComplex => Some(3),
            _ => None,
        }
    }
}

/// A type descriptor.
#[derive(Clone, Debug)]
pub enum Type {
    Basic(BasicKind),
    Named(Named),
    Struct(Rc<StructType>),
    Pointer(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Slice(Box<Type>),
    /// `None` length is the open `[...]T` form, fixed by an array literal.
    Array(Box<Type>, Option<usize>),
    Signature(Rc<Signature>),
    Tuple(Tuple),
    Interface(Rc<InterfaceType>),
    TypeParam(TypeParam),
    Overload(OverloadFunc),
}

impl Type {
    pub fn invalid() -> Type {
        Type::Basic(BasicKind::Invalid)
    }

    pub fn bool() -> Type {
        Type::Basic(BasicKind::Bool)
    }

    pub fn int() -> Type {
        Type::Basic(BasicKind::Int)
    }

    pub fn float64() -> Type {
        Type::Basic(BasicKind::Float64)
    }

    pub fn string() -> Type {
        Type::Basic(BasicKind::String)
    }

    pub fn empty_interface() -> Type {
        Type::Interface(Rc::new(InterfaceType::default()))
    }

    pub fn pointer(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    pub fn slice(elem: Type) -> Type {
        Type::Slice(Box::new(elem))
    }

    pub fn array(elem: Type, len: Option<usize>) -> Type {
        Type::Array(Box::new(elem), len)
    }

    pub fn map(key: Type, elem: Type) -> Type {
        Type::Map(Box::new(key), Box::new(elem))
    }

    pub fn tuple(types: Vec<Type>) -> Type {
        Type::Tuple(Tuple::from_types(types))
    }

    pub fn signature(sig: Signature) -> Type {
        Type::Signature(Rc::new(sig))
    }

    pub fn structure(fields: Vec<Field>) -> Type {
        Type::Struct(Rc::new(StructType { fields }))
    }

    /// The underlying type. Named types resolve to their declared
    /// underlying type; every other type is its own underlying type.
    pub fn underlying(&self) -> Type {
        match self {
            Type::Named(named) => named.underlying(),
            _ => self.clone(),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named(_) | Type::Basic(_))
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, Type::Basic(kind) if kind.is_untyped())
    }

    /// The basic kind of the underlying type, if it is basic.
    pub fn basic_kind(&self) -> Option<BasicKind> {
        match self.underlying() {
            Type::Basic(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether this type refers to any of the given type parameters.
    pub fn mentions(&self, params: &[TypeParam]) -> bool {
        match self {
            Type::TypeParam(tp) => params.contains(tp),
            Type::Pointer(elem) | Type::Slice(elem) | Type::Array(elem, _) => elem.mentions(params),
            Type::Map(key, elem) => key.mentions(params) || elem.mentions(params),
            Type::Signature(sig) => {
                sig.params.mentions(params) || sig.results.mentions(params)
            }
            Type::Tuple(tuple) => tuple.mentions(params),
            Type::Struct(st) => st.fields.iter().any(|f| f.ty.mentions(params)),
            _ => false,
        }
    }

    /// Replaces each type parameter in `params` with the matching entry of `args`.
    pub fn subst(&self, params: &[TypeParam], args: &[Type]) -> Type {
        match self {
            Type::TypeParam(tp) => params
                .iter()
                .position(|p| p == tp)
                .and_then(|i| args.get(i).cloned())
                .unwrap_or_else(|| self.clone()),
            Type::Pointer(elem) => Type::pointer(elem.subst(params, args)),
            Type::Slice(elem) => Type::slice(elem.subst(params, args)),
            Type::Array(elem, len) => Type::array(elem.subst(params, args), *len),
            Type::Map(key, elem) => Type::map(key.subst(params, args), elem.subst(params, args)),
            Type::Signature(sig) => Type::signature(sig.subst(params, args)),
            Type::Tuple(tuple) => Type::Tuple(tuple.subst(params, args)),
            Type::Struct(st) => Type::structure(
                st.fields
                    .iter()
                    .map(|f| Field {
                        name: f.name.clone(),
                        ty: f.ty.subst(params, args),
                        embedded: f.embedded,
                    })
                    .collect(),
            ),
            _ => self.clone(),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Basic(a), Type::Basic(b)) => a == b,
            (Type::Named(a), Type::Named(b)) => a == b,
            (Type::Struct(a), Type::Struct(b)) => {
                a.fields.len() == b.fields.len()
                    && a.fields.iter().zip(b.fields.iter()).all(|(x, y)| {
                        x.name == y.name && x.embedded == y.embedded && x.ty == y.ty
                    })
            }
            (Type::Pointer(a), Type::Pointer(b)) => a == b,
            (Type::Map(ak, av), Type::Map(bk, bv)) => ak == bk && av == bv,
            (Type::Slice(a), Type::Slice(b)) => a == b,
            (Type::Array(a, n), Type::Array(b, m)) => n == m && a == b,
            (Type::Signature(a), Type::Signature(b)) => a.identical(b),
            (Type::Tuple(a), Type::Tuple(b)) => a == b,
            (Type::Interface(a), Type::Interface(b)) => a == b,
            (Type::TypeParam(a), Type::TypeParam(b)) => a == b,
            (Type::Overload(a), Type::Overload(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(kind) => write!(f, "{}", kind.name()),
            Type::Named(named) => write!(f, "{}", named.name()),
            Type::Struct(st) => {
                write!(f, "struct{{")?;
                for (i, field) in st.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                }
                write!(f, "}}")
            }
            Type::Pointer(elem) => write!(f, "*{}", elem),
            Type::Map(key, elem) => write!(f, "map[{}]{}", key, elem),
            Type::Slice(elem) => write!(f, "[]{}", elem),
            Type::Array(elem, Some(len)) => write!(f, "[{}]{}", len, elem),
            Type::Array(elem, None) => write!(f, "[...]{}", elem),
            Type::Signature(sig) => write!(f, "func{}", sig),
            Type::Tuple(tuple) => write!(f, "{}", tuple),
            Type::Interface(iface) => write!(f, "{}", iface),
            Type::TypeParam(tp) => write!(f, "{}", tp.name()),
            Type::Overload(overload) => write!(f, "overload {}", overload.name()),
        }
    }
}

/// A struct field.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            embedded: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructType {
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An ordered group of variables: parameter lists and result lists.
#[derive(Debug, Clone, Default)]
pub struct Tuple {
    vars: Vec<Var>,
}

impl Tuple {
    pub fn new(vars: Vec<Var>) -> Self {
        Tuple { vars }
    }

    pub fn from_types(types: Vec<Type>) -> Self {
        Tuple {
            vars: types.into_iter().map(|ty| Var::new("", ty)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn at(&self, i: usize) -> Option<&Var> {
        self.vars.get(i)
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn types(&self) -> Vec<Type> {
        self.vars.iter().map(|v| v.ty().clone()).collect()
    }

    /// Whether every element carries a name (a bare `return` is then legal).
    pub fn all_named(&self) -> bool {
        self.vars.iter().all(|v| !v.name().is_empty())
    }

    fn mentions(&self, params: &[TypeParam]) -> bool {
        self.vars.iter().any(|v| v.ty().mentions(params))
    }

    fn subst(&self, params: &[TypeParam], args: &[Type]) -> Tuple {
        Tuple {
            vars: self
                .vars
                .iter()
                .map(|v| Var::new(v.name(), v.ty().subst(params, args)))
                .collect(),
        }
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Tuple) -> bool {
        self.vars.len() == other.vars.len()
            && self
                .vars
                .iter()
                .zip(other.vars.iter())
                .all(|(a, b)| a.ty() == b.ty())
    }
}

impl Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, var) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", var.ty())?;
        }
        write!(f, ")")
    }
}

/// A function signature.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    pub recv: Option<Var>,
    pub type_params: Vec<TypeParam>,
    pub params: Tuple,
    pub results: Tuple,
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Tuple, results: Tuple, variadic: bool) -> Self {
        Signature {
            recv: None,
            type_params: vec![],
            params,
            results,
            variadic,
        }
    }

    pub fn with_recv(mut self, recv: Var) -> Self {
        self.recv = Some(recv);
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParam>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// The method value form: the same signature without its receiver.
    pub fn without_recv(&self) -> Signature {
        Signature {
            recv: None,
            ..self.clone()
        }
    }

    /// Instantiates a generic signature with solved type arguments.
    pub fn instantiate(&self, args: &[Type]) -> Signature {
        let mut sig = self.subst(&self.type_params, args);
        sig.type_params.clear();
        sig
    }

    fn subst(&self, params: &[TypeParam], args: &[Type]) -> Signature {
        Signature {
            recv: self.recv.clone(),
            type_params: self.type_params.clone(),
            params: self.params.subst(params, args),
            results: self.results.subst(params, args),
            variadic: self.variadic,
        }
    }

    fn identical(&self, other: &Signature) -> bool {
        self.variadic == other.variadic
            && self.type_params.len() == other.type_params.len()
            && self.params == other.params
            && self.results == other.results
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let count = self.params.len();
        for (i, var) in self.params.vars().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match (self.variadic && i + 1 == count, var.ty()) {
                (true, Type::Slice(elem)) => write!(f, "...{}", elem)?,
                _ => write!(f, "{}", var.ty())?,
            }
        }
        write!(f, ")")?;
        match self.results.len() {
            0 => Ok(()),
            1 if self.results.all_named() => write!(f, " {}", self.results),
            1 => write!(f, " {}", self.results.vars()[0].ty()),
            _ => write!(f, " {}", self.results),
        }
    }
}

/// An interface: a method set, optionally restricted to a type set when
/// used as a generic constraint.
#[derive(Debug, Clone, Default)]
pub struct InterfaceType {
    pub methods: Vec<(String, Signature)>,
    pub type_set: Option<Vec<Type>>,
    /// Restricts the type set to comparable types.
    pub comparable: bool,
}

impl InterfaceType {
    pub fn with_methods(methods: Vec<(String, Signature)>) -> Self {
        InterfaceType {
            methods,
            ..Default::default()
        }
    }

    pub fn with_type_set(types: Vec<Type>) -> Self {
        InterfaceType {
            type_set: Some(types),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.type_set.is_none() && !self.comparable
    }

    pub fn method(&self, name: &str) -> Option<&Signature> {
        self.methods.iter().find(|m| m.0 == name).map(|m| &m.1)
    }
}

impl PartialEq for InterfaceType {
    fn eq(&self, other: &InterfaceType) -> bool {
        self.type_set == other.type_set
            && self.comparable == other.comparable
            && self.methods.len() == other.methods.len()
            && self.methods.iter().all(|(name, sig)| {
                other
                    .method(name)
                    .is_some_and(|theirs| sig.identical(theirs))
            })
    }
}

impl Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface{{")?;
        let mut first = true;
        if self.comparable {
            write!(f, "comparable")?;
            first = false;
        }
        for (name, sig) in self.methods.iter() {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}{}", name, sig)?;
        }
        if let Some(types) = &self.type_set {
            if !first {
                write!(f, "; ")?;
            }
            let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
            write!(f, "{}", names.join(" | "))?;
        }
        write!(f, "}}")
    }
}

struct NamedData {
    name: String,
    underlying: RefCell<Type>,
    methods: RefCell<Vec<Func>>,
    overloads: RefCell<Vec<OverloadFunc>>,
}

/// A declared type. The underlying type may be set after creation so that
/// recursive types can refer to themselves.
#[derive(Clone)]
pub struct Named(Rc<NamedData>);

impl Named {
    pub fn new(name: impl Into<String>, underlying: Type) -> Self {
        Named(Rc::new(NamedData {
            name: name.into(),
            underlying: RefCell::new(underlying),
            methods: RefCell::new(vec![]),
            overloads: RefCell::new(vec![]),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn underlying(&self) -> Type {
        self.0.underlying.borrow().clone()
    }

    pub fn set_underlying(&self, underlying: Type) {
        *self.0.underlying.borrow_mut() = underlying;
    }

    pub fn methods(&self) -> Ref<'_, Vec<Func>> {
        self.0.methods.borrow()
    }

    pub fn add_method(&self, method: Func) {
        self.0.methods.borrow_mut().push(method);
    }

    pub fn add_overload(&self, overload: OverloadFunc) {
        self.0.overloads.borrow_mut().push(overload);
    }

    /// Finds a method by name. Plain methods shadow overload sets.
    pub fn method(&self, name: &str) -> Option<Symbol> {
        if let Some(method) = self.0.methods.borrow().iter().find(|m| m.name() == name) {
            return Some(Symbol::Func(method.clone()));
        }
        self.0
            .overloads
            .borrow()
            .iter()
            .find(|o| o.name() == name)
            .map(|o| Symbol::Overload(o.clone()))
    }
}

impl PartialEq for Named {
    fn eq(&self, other: &Named) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Methods refer back to their receiver type, so only the name is printed.
impl Debug for Named {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Named({})", self.0.name)
    }
}

#[derive(Debug)]
struct TypeParamData {
    name: String,
    constraint: Type,
}

/// A type parameter of a generic function.
#[derive(Debug, Clone)]
pub struct TypeParam(Rc<TypeParamData>);

impl TypeParam {
    pub fn new(name: impl Into<String>, constraint: Type) -> Self {
        TypeParam(Rc::new(TypeParamData {
            name: name.into(),
            constraint,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn constraint(&self) -> &Type {
        &self.0.constraint
    }
}

impl PartialEq for TypeParam {
    fn eq(&self, other: &TypeParam) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// The type slot of an auto variable, shared between its declaration
/// statement and every reference to it.
#[derive(Debug, Clone, Default)]
pub struct AutoType(Rc<RefCell<Option<Type>>>);

impl AutoType {
    pub fn get(&self) -> Option<Type> {
        self.0.borrow().clone()
    }

    pub fn set(&self, ty: Type) {
        *self.0.borrow_mut() = Some(ty);
    }
}

impl PartialEq for AutoType {
    fn eq(&self, other: &AutoType) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
