use crate::{
    ast::{
        ast::Expr,
        symbols::{BuiltinFunc, Symbol},
        types::{BasicKind, Signature, Type},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::{
        operand::{Operand, OperandMode},
        oracle::InferRequest,
    },
    MK_ERROR, MK_TRACE,
};

use super::code_builder::CodeBuilder;

impl CodeBuilder {
    /// Calls the callee beneath the top `n` operands with those operands as
    /// arguments. `ellipsis` spreads the last argument into a variadic
    /// parameter.
    pub fn call(&mut self, n: usize, ellipsis: bool) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "Call {} {}", n, ellipsis);
        self.check_args(n + 1, "Call")?;

        let args = self.stk.get_args(n).to_vec();
        let callee = self.stk.get_args(n + 1)[0].clone();
        let ret = self.check_call(&callee, &args, ellipsis, "Call")?;
        self.stk.ret(n + 1, ret);
        Ok(self)
    }

    /// Type checks a call and returns the operand for its result.
    pub(crate) fn check_call(
        &self,
        callee: &Operand,
        args: &[Operand],
        ellipsis: bool,
        operation: &'static str,
    ) -> Result<Operand, Error> {
        match callee.mode {
            OperandMode::Builtin => {
                let builtin = match &callee.value {
                    Expr::Ident(name) => match self.pkg.universe.lookup(name) {
                        Some(Symbol::Builtin(builtin)) => Some(builtin),
                        _ => None,
                    },
                    _ => None,
                };
                match builtin {
                    Some(builtin) => self.call_builtin(builtin, args, ellipsis, operation),
                    None => MK_ERROR!(
                        ErrorImpl::NotCallable {
                            expr: callee.value.to_string()
                        },
                        operation
                    ),
                }
            }
            OperandMode::TypeExpr => self.convert(&callee.ty(), args, ellipsis, operation),
            mode if !mode.is_value() => MK_ERROR!(
                ErrorImpl::NotCallable {
                    expr: callee.value.to_string()
                },
                operation
            ),
            _ => match callee.ty().underlying() {
                Type::Signature(sig) => {
                    self.call_signature(&callee.value, &sig, args, ellipsis, operation)
                }
                Type::Overload(overload) => {
                    for variant in overload.variants() {
                        let fun = match &callee.value {
                            Expr::Selector { x, .. } => {
                                Expr::selector((**x).clone(), variant.name())
                            }
                            _ => Expr::ident(variant.name()),
                        };
                        let sig = variant.signature().without_recv();
                        if let Ok(ret) = self.call_signature(&fun, &sig, args, ellipsis, operation)
                        {
                            MK_TRACE!(self.config, "Overload {} resolved to {}", overload.name(), variant.name());
                            return Ok(ret);
                        }
                    }
                    MK_ERROR!(
                        ErrorImpl::NoMatchingOverload {
                            name: overload.name().to_string()
                        },
                        operation
                    )
                }
                _ => MK_ERROR!(
                    ErrorImpl::NotCallable {
                        expr: callee.value.to_string()
                    },
                    operation
                ),
            },
        }
    }

    fn call_signature(
        &self,
        fun: &Expr,
        sig: &Signature,
        args: &[Operand],
        ellipsis: bool,
        operation: &'static str,
    ) -> Result<Operand, Error> {
        let arg_ops = self.expand_args(args, operation)?;
        let nargs = arg_ops.len();
        let nparams = sig.params.len();
        let declared = sig.params.types();

        let params: Vec<Type> = if ellipsis {
            if !sig.variadic {
                return MK_ERROR!(
                    ErrorImpl::CannotSpread {
                        callee: fun.to_string()
                    },
                    operation
                );
            }
            if nargs != nparams {
                return arity_mismatch(nparams, nargs, operation);
            }
            declared
        } else if sig.variadic {
            if nargs + 1 < nparams {
                return arity_mismatch(nparams - 1, nargs, operation);
            }
            let elem = match declared.last() {
                Some(Type::Slice(elem)) => (**elem).clone(),
                _ => Type::invalid(),
            };
            let mut params = declared[..nparams - 1].to_vec();
            params.resize(nargs, elem);
            params
        } else {
            if nargs != nparams {
                return arity_mismatch(nparams, nargs, operation);
            }
            declared
        };

        let (sig, params) = if sig.is_generic() {
            let inferred = self.infer_with(sig, &[], &params, &arg_ops, operation)?;
            let params: Vec<Type> = params
                .iter()
                .map(|p| p.subst(&sig.type_params, &inferred))
                .collect();
            (sig.instantiate(&inferred), params)
        } else {
            (sig.clone(), params)
        };

        for (arg, param) in arg_ops.iter().zip(params.iter()) {
            let ty = arg.ty();
            if !self.oracle.assignable(&ty, param) {
                return MK_ERROR!(
                    ErrorImpl::NotAssignable {
                        value_type: ty.to_string(),
                        target_type: param.to_string()
                    },
                    operation
                );
            }
        }

        let call = Expr::call(
            fun.clone(),
            args.iter().map(|a| a.value.clone()).collect(),
            ellipsis,
        );
        Ok(result_operand(call, sig.results.types()))
    }

    /// Arguments as single values. A lone multi-valued argument is spread
    /// into one operand per result.
    fn expand_args(&self, args: &[Operand], operation: &'static str) -> Result<Vec<Operand>, Error> {
        if let [single] = args {
            if let Type::Tuple(tuple) = single.ty() {
                if single.mode.is_value() {
                    return Ok(tuple
                        .types()
                        .into_iter()
                        .map(|ty| Operand::new(single.value.clone(), ty, OperandMode::Value))
                        .collect());
                }
            }
        }

        let mut expanded = Vec::with_capacity(args.len());
        for arg in args {
            self.single_value(arg, operation)?;
            expanded.push(arg.clone());
        }
        Ok(expanded)
    }

    /// Solves the type arguments of generic `sig` for the given arguments,
    /// with `explicit` as the leading type arguments.
    ///
    /// A variadic tail is matched against every trailing argument.
    pub fn infer_type_args(
        &self,
        sig: &Signature,
        explicit: &[Type],
        args: &[Operand],
    ) -> Result<Vec<Type>, Error> {
        let mut params = sig.params.types();
        if sig.variadic && args.len() + 1 >= params.len() {
            if let Some(Type::Slice(elem)) = params.pop() {
                params.resize(args.len(), *elem);
            }
        }
        if params.len() != args.len() {
            return arity_mismatch(params.len(), args.len(), "InferTypeArgs");
        }
        self.infer_with(sig, explicit, &params, args, "InferTypeArgs")
    }

    fn infer_with(
        &self,
        sig: &Signature,
        explicit: &[Type],
        params: &[Type],
        args: &[Operand],
        operation: &'static str,
    ) -> Result<Vec<Type>, Error> {
        let outcome = self.oracle.infer(&InferRequest {
            type_params: &sig.type_params,
            explicit,
            params,
            args,
        });

        if let Some(message) = outcome.diagnostics.into_iter().next() {
            return MK_ERROR!(ErrorImpl::CannotInferTypeArgs { message }, operation);
        }
        if outcome.inferred.len() != sig.type_params.len() {
            let missing = sig
                .type_params
                .get(outcome.inferred.len())
                .map(|tp| tp.name().to_string())
                .unwrap_or_default();
            return MK_ERROR!(
                ErrorImpl::CannotInferTypeArgs {
                    message: format!("cannot infer {}", missing)
                },
                operation
            );
        }
        Ok(outcome.inferred)
    }

    fn convert(
        &self,
        target: &Type,
        args: &[Operand],
        ellipsis: bool,
        operation: &'static str,
    ) -> Result<Operand, Error> {
        if args.len() != 1 || ellipsis {
            return arity_mismatch(1, args.len(), operation);
        }
        let arg = &args[0];
        let ty = self.single_value(arg, operation)?;
        if !self.oracle.convertible(&ty, target) {
            return MK_ERROR!(
                ErrorImpl::CannotConvert {
                    value_type: ty.to_string(),
                    target_type: target.to_string()
                },
                operation
            );
        }

        let value = Expr::call(Expr::Type(target.clone()), vec![arg.value.clone()], false);
        Ok(Operand::new(value, target.clone(), OperandMode::Value))
    }

    fn call_builtin(
        &self,
        builtin: BuiltinFunc,
        args: &[Operand],
        ellipsis: bool,
        operation: &'static str,
    ) -> Result<Operand, Error> {
        let name = builtin.name();
        let invalid = |ty: &Type| {
            MK_ERROR!(
                ErrorImpl::InvalidArgument {
                    func: name.to_string(),
                    ty: ty.to_string()
                },
                operation
            )
        };
        if ellipsis && builtin != BuiltinFunc::Append {
            return MK_ERROR!(
                ErrorImpl::CannotSpread {
                    callee: name.to_string()
                },
                operation
            );
        }

        let ty = match builtin {
            BuiltinFunc::Len | BuiltinFunc::Cap => {
                if args.len() != 1 {
                    return arity_mismatch(1, args.len(), operation);
                }
                let ty = self.single_value(&args[0], operation)?;
                let ok = match ty.underlying() {
                    Type::Slice(_) | Type::Array(..) => true,
                    Type::Pointer(elem) => matches!(elem.underlying(), Type::Array(..)),
                    Type::Map(..) => builtin == BuiltinFunc::Len,
                    Type::Basic(kind) => builtin == BuiltinFunc::Len && kind.is_string(),
                    _ => false,
                };
                if !ok {
                    return invalid(&ty);
                }
                Type::int()
            }
            BuiltinFunc::Append => {
                let Some((first, rest)) = args.split_first() else {
                    return arity_mismatch(1, 0, operation);
                };
                let slice = self.single_value(first, operation)?;
                let Type::Slice(elem) = slice.underlying() else {
                    return invalid(&slice);
                };

                if ellipsis {
                    if rest.len() != 1 {
                        return arity_mismatch(2, args.len(), operation);
                    }
                    let ty = self.single_value(&rest[0], operation)?;
                    let bytes_from_string = matches!(elem.underlying(), Type::Basic(BasicKind::Uint8))
                        && ty.basic_kind().is_some_and(BasicKind::is_string);
                    if !bytes_from_string && !self.oracle.assignable(&ty, &slice) {
                        return MK_ERROR!(
                            ErrorImpl::NotAssignable {
                                value_type: ty.to_string(),
                                target_type: slice.to_string()
                            },
                            operation
                        );
                    }
                } else {
                    for arg in rest {
                        let ty = self.single_value(arg, operation)?;
                        if !self.oracle.assignable(&ty, &elem) {
                            return MK_ERROR!(
                                ErrorImpl::NotAssignable {
                                    value_type: ty.to_string(),
                                    target_type: elem.to_string()
                                },
                                operation
                            );
                        }
                    }
                }
                slice
            }
            BuiltinFunc::New => {
                if args.len() != 1 {
                    return arity_mismatch(1, args.len(), operation);
                }
                if args[0].mode != OperandMode::TypeExpr {
                    return MK_ERROR!(
                        ErrorImpl::InvalidArgument {
                            func: name.to_string(),
                            ty: args[0].value.to_string()
                        },
                        operation
                    );
                }
                Type::pointer(args[0].ty())
            }
        };

        let value = Expr::call(
            Expr::ident(name),
            args.iter().map(|a| a.value.clone()).collect(),
            ellipsis,
        );
        Ok(Operand::new(value, ty, OperandMode::Value))
    }
}

fn result_operand(call: Expr, mut results: Vec<Type>) -> Operand {
    match results.len() {
        0 => Operand::new(call, Type::tuple(vec![]), OperandMode::NoValue),
        1 => Operand::new(call, results.remove(0), OperandMode::Value),
        _ => Operand::new(call, Type::tuple(results), OperandMode::Value),
    }
}

fn arity_mismatch<T>(expected: usize, received: usize, operation: &'static str) -> Result<T, Error> {
    MK_ERROR!(ErrorImpl::ArityMismatch { expected, received }, operation)
}
