use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{
        ast::Decl,
        symbols::{Func, Scope, Symbol, Var},
        types::{Named, Signature, Type},
    },
    errors::errors::{Error, ErrorImpl},
    overload::overload::init_overloads,
    type_checker::universe::new_universe,
    MK_ERROR,
};

lazy_static! {
    static ref IDENT: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

pub fn is_valid_identifier(name: &str) -> bool {
    IDENT.is_match(name)
}

/// A package under construction.
#[derive(Debug)]
pub struct Package {
    pub name: String,
    pub universe: Scope,
    pub scope: Scope,
    /// Scope of the operator callables.
    pub builtin: Scope,
    decls: Vec<Decl>,
    auto_idx: usize,
    require_idx: usize,
    required: HashSet<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let universe = new_universe();
        let scope = Scope::new(Some(&universe), name.clone());

        Package {
            name,
            universe,
            scope,
            builtin: Scope::new(None, "builtin"),
            decls: vec![],
            auto_idx: 0,
            require_idx: 0,
            required: HashSet::new(),
        }
    }

    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    pub(crate) fn push_decl(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    /// Declares a named type. Its underlying type is set afterwards with
    /// `Named::set_underlying`, so it may refer to itself.
    pub fn new_type(&mut self, name: &str) -> Result<Named, Error> {
        if !is_valid_identifier(name) {
            return MK_ERROR!(
                ErrorImpl::InvalidIdentifier {
                    name: name.to_string()
                },
                "NewType"
            );
        }

        let named = Named::new(name, Type::invalid());
        if self
            .scope
            .insert(Symbol::new_type_name(name, Type::Named(named.clone())))
            .is_some()
        {
            return MK_ERROR!(
                ErrorImpl::AlreadyDeclared {
                    name: name.to_string()
                },
                "NewType"
            );
        }
        Ok(named)
    }

    /// Declares a function, or a method when `recv` is given.
    pub fn new_func(
        &mut self,
        recv: Option<Var>,
        name: &str,
        sig: Signature,
    ) -> Result<Func, Error> {
        if !is_valid_identifier(name) {
            return MK_ERROR!(
                ErrorImpl::InvalidIdentifier {
                    name: name.to_string()
                },
                "NewFunc"
            );
        }

        let func = match recv {
            Some(recv) => {
                let base = match recv.ty() {
                    Type::Pointer(elem) => (**elem).clone(),
                    ty => ty.clone(),
                };
                let Type::Named(named) = base else {
                    return MK_ERROR!(
                        ErrorImpl::InvalidArgument {
                            func: name.to_string(),
                            ty: recv.ty().to_string()
                        },
                        "NewFunc"
                    );
                };
                if named.methods().iter().any(|m| m.name() == name) {
                    return MK_ERROR!(
                        ErrorImpl::AlreadyDeclared {
                            name: format!("{}.{}", named.name(), name)
                        },
                        "NewFunc"
                    );
                }

                let func = Func::new(name, sig.with_recv(recv));
                named.add_method(func.clone());
                func
            }
            None => {
                let func = Func::new(name, sig);
                if self.scope.insert(Symbol::Func(func.clone())).is_some() {
                    return MK_ERROR!(
                        ErrorImpl::AlreadyDeclared {
                            name: name.to_string()
                        },
                        "NewFunc"
                    );
                }
                func
            }
        };

        self.decls.push(Decl::Func(func.clone()));
        Ok(func)
    }

    /// Groups the `name__N` functions and methods declared so far into
    /// overload sets.
    pub fn init_overloads(&self) -> Result<(), Error> {
        init_overloads(&self.scope)
    }

    pub(crate) fn next_auto_idx(&mut self) -> usize {
        self.auto_idx += 1;
        self.auto_idx
    }

    fn has_name(&self, name: &str) -> bool {
        self.scope.has_name_deep(name)
            || self.required.contains(name)
            || self.builtin.lookup(name).is_some()
            || self.universe.lookup(name).is_some()
    }

    /// Returns a name based on `name` that nothing in the package uses yet,
    /// and whether it had to be renamed.
    pub fn require_name(&mut self, name: &str) -> (String, bool) {
        let mut ret = name.to_string();
        let mut renamed = false;
        while self.has_name(&ret) {
            self.require_idx += 1;
            ret = format!("{}{}", name, self.require_idx);
            renamed = true;
        }
        self.required.insert(ret.clone());
        (ret, renamed)
    }
}
