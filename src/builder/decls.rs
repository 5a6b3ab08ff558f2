use crate::{
    ast::{
        ast::{Decl, DeclKind, Stmt, ValueSpec},
        symbols::{Scope, Symbol, Var},
        types::{AutoType, BasicKind, Type},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::operand::OperandMode,
    MK_ERROR, MK_TRACE,
};

use super::{code_builder::CodeBuilder, context::BlockKind, package::is_valid_identifier};

/// A variable declared before its type is known. The first assignment to
/// it fixes the type.
#[derive(Debug, Clone)]
pub struct AutoVar {
    name: String,
    ty: AutoType,
}

impl AutoVar {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type, once an assignment has fixed it.
    pub fn ty(&self) -> Option<Type> {
        self.ty.get()
    }

    pub(crate) fn type_cell(&self) -> &AutoType {
        &self.ty
    }
}

/// A declaration waiting for its initializers.
#[derive(Debug)]
pub(crate) struct ValueDecl {
    kind: DeclKind,
    names: Vec<String>,
    ty: Option<Type>,
    scope: Scope,
    at_package: bool,
}

impl CodeBuilder {
    /// Emits the declaration of a variable whose type is filled in by its
    /// first assignment. The variable is referenced through the returned
    /// handle, not by scope lookup.
    pub fn new_auto_var(&mut self, name: &str) -> AutoVar {
        MK_TRACE!(self.config, "NewAutoVar {}", name);
        let auto = AutoVar {
            name: name.to_string(),
            ty: AutoType::default(),
        };
        self.emit(Stmt::AutoVar {
            name: auto.name.clone(),
            ty: auto.ty.clone(),
        });
        auto
    }

    /// Declares variables of type `ty` without initializers.
    pub fn new_var(&mut self, ty: Type, names: &[&str]) -> Result<Vec<Var>, Error> {
        MK_TRACE!(self.config, "NewVar {} {:?}", ty, names);
        self.check_names(names, "NewVar")?;

        let vars: Vec<Var> = names.iter().map(|name| Var::new(*name, ty.clone())).collect();
        for var in vars.iter().filter(|v| v.name() != "_") {
            self.current.scope.insert(Symbol::Var(var.clone()));
        }
        self.emit_spec(ValueSpec {
            kind: DeclKind::Var,
            names: names.iter().map(|n| n.to_string()).collect(),
            ty: Some(ty),
            values: vec![],
        });
        Ok(vars)
    }

    /// Starts `var names [ty] = ...`. The initializers are pushed next and
    /// consumed by [`CodeBuilder::end_init`].
    pub fn new_var_start(&mut self, ty: Option<Type>, names: &[&str]) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "NewVarStart {:?}", names);
        self.start_value_decl(DeclKind::Var, ty, names, "NewVarStart")
    }

    /// Starts `names := ...`.
    pub fn define_var_start(&mut self, names: &[&str]) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "DefineVarStart {:?}", names);
        self.start_value_decl(DeclKind::Define, None, names, "DefineVarStart")
    }

    /// Starts `const names [ty] = ...`.
    pub fn new_const_start(
        &mut self,
        ty: Option<Type>,
        names: &[&str],
    ) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "NewConstStart {:?}", names);
        self.start_value_decl(DeclKind::Const, ty, names, "NewConstStart")
    }

    /// Consumes `n` initializers of the pending declaration. On failure the
    /// declaration stays pending.
    pub fn end_init(&mut self, n: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "EndInit {}", n);
        let Some(decl) = self.var_decl.take() else {
            return MK_ERROR!(ErrorImpl::NoPendingDeclaration, "EndInit");
        };

        if let Err(error) = self.finish_value_decl(&decl, n) {
            self.var_decl = Some(decl);
            return Err(error);
        }
        Ok(self)
    }

    fn start_value_decl(
        &mut self,
        kind: DeclKind,
        ty: Option<Type>,
        names: &[&str],
        operation: &'static str,
    ) -> Result<&mut Self, Error> {
        self.check_names(names, operation)?;
        self.var_decl = Some(ValueDecl {
            kind,
            names: names.iter().map(|n| n.to_string()).collect(),
            ty,
            scope: self.current.scope.clone(),
            at_package: self.current.kind == BlockKind::Package,
        });
        Ok(self)
    }

    fn check_names(&self, names: &[&str], operation: &'static str) -> Result<(), Error> {
        for (i, name) in names.iter().enumerate() {
            if !is_valid_identifier(name) {
                return MK_ERROR!(
                    ErrorImpl::InvalidIdentifier {
                        name: name.to_string()
                    },
                    operation
                );
            }
            if *name != "_"
                && (self.current.scope.lookup(name).is_some() || names[..i].contains(name))
            {
                return MK_ERROR!(
                    ErrorImpl::AlreadyDeclared {
                        name: name.to_string()
                    },
                    operation
                );
            }
        }
        Ok(())
    }

    fn finish_value_decl(&mut self, decl: &ValueDecl, n: usize) -> Result<(), Error> {
        self.check_args(n, "EndInit")?;
        let args = self.stk.get_args(n).to_vec();
        let count = decl.names.len();

        let value_types = if n == count {
            let mut types = Vec::with_capacity(n);
            for arg in args.iter() {
                types.push(self.single_value(arg, "EndInit")?);
            }
            types
        } else if n == 1 && decl.kind != DeclKind::Const {
            self.spread_types(&args[0], count, "EndInit")?
        } else {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: count,
                    received: n
                },
                "EndInit"
            );
        };

        if decl.kind == DeclKind::Const {
            if let Some(arg) = args.iter().find(|a| a.mode != OperandMode::Constant) {
                return MK_ERROR!(
                    ErrorImpl::NotConstant {
                        expr: arg.value.to_string()
                    },
                    "EndInit"
                );
            }
        }

        let mut symbols = Vec::with_capacity(count);
        for (i, (name, value_ty)) in decl.names.iter().zip(value_types.iter()).enumerate() {
            let ty = match &decl.ty {
                Some(ty) => {
                    if !self.oracle.assignable(value_ty, ty) {
                        return MK_ERROR!(
                            ErrorImpl::NotAssignable {
                                value_type: value_ty.to_string(),
                                target_type: ty.to_string()
                            },
                            "EndInit"
                        );
                    }
                    ty.clone()
                }
                None if *value_ty == Type::Basic(BasicKind::UntypedNil) => {
                    return MK_ERROR!(ErrorImpl::UseOfUntypedNil, "EndInit");
                }
                None if decl.kind == DeclKind::Const => value_ty.clone(),
                None => self.oracle.default_type(value_ty),
            };

            if name == "_" {
                continue;
            }
            if decl.scope.lookup(name).is_some() {
                return MK_ERROR!(ErrorImpl::AlreadyDeclared { name: name.clone() }, "EndInit");
            }
            symbols.push(match decl.kind {
                DeclKind::Const => Symbol::new_const(name.clone(), ty, args[i].value.clone()),
                _ => Symbol::Var(Var::new(name.clone(), ty)),
            });
        }

        for symbol in symbols {
            decl.scope.insert(symbol);
        }
        let spec = ValueSpec {
            kind: decl.kind,
            names: decl.names.clone(),
            ty: decl.ty.clone(),
            values: args.iter().map(|a| a.value.clone()).collect(),
        };
        if decl.at_package {
            self.pkg.push_decl(Decl::Value(spec));
        } else {
            self.emit(Stmt::Decl(spec));
        }
        self.stk.pop_n(n);
        Ok(())
    }

    fn emit_spec(&mut self, spec: ValueSpec) {
        if self.current.kind == BlockKind::Package {
            self.pkg.push_decl(Decl::Value(spec));
        } else {
            self.emit(Stmt::Decl(spec));
        }
    }
}
