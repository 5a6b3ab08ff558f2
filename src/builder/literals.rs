use crate::{
    ast::{
        ast::Expr,
        types::{BasicKind, Type},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::operand::{Operand, OperandMode},
    MK_ERROR, MK_TRACE,
};

use super::code_builder::CodeBuilder;

impl CodeBuilder {
    /// Builds a map literal from `n` operands, alternating keys and values.
    ///
    /// Without `ty` the key and value types are inferred from the operands,
    /// and an empty literal is a `map[string]interface{}`.
    pub fn map_lit(&mut self, ty: Option<Type>, n: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "MapLit {} {}", display_opt(&ty), n);
        if n % 2 != 0 {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: n + 1,
                    received: n
                },
                "MapLit"
            );
        }
        let explicit = match &ty {
            Some(t) => match t.underlying() {
                Type::Map(key, elem) => Some((*key, *elem)),
                _ => return invalid_composite(t, "map", "MapLit"),
            },
            None => None,
        };
        self.check_args(n, "MapLit")?;
        let args = self.stk.get_args(n).to_vec();

        let ty = match (ty, explicit) {
            (Some(ty), Some((key, elem))) => {
                for pair in args.chunks(2) {
                    self.check_element(&pair[0], &key, "MapLit")?;
                    self.check_element(&pair[1], &elem, "MapLit")?;
                }
                ty
            }
            _ if n == 0 => Type::map(Type::string(), Type::empty_interface()),
            _ => {
                let key = self.bound_element_type(&args, 0, n, 2, "MapLit")?;
                let elem = self.bound_element_type(&args, 1, n, 2, "MapLit")?;
                Type::map(self.oracle.default_type(&key), self.oracle.default_type(&elem))
            }
        };

        let elts = args
            .chunks(2)
            .map(|pair| Expr::KeyValue {
                key: Box::new(pair[0].value.clone()),
                value: Box::new(pair[1].value.clone()),
            })
            .collect();
        self.push_composite(ty, elts, n);
        Ok(self)
    }

    /// Builds a slice literal from `n` operands. Without `ty` the element
    /// type is inferred, and an empty literal is a `[]interface{}`.
    pub fn slice_lit(&mut self, ty: Option<Type>, n: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "SliceLit {} {}", display_opt(&ty), n);
        let explicit = match &ty {
            Some(t) => match t.underlying() {
                Type::Slice(elem) => Some(*elem),
                _ => return invalid_composite(t, "slice", "SliceLit"),
            },
            None => None,
        };
        self.check_args(n, "SliceLit")?;
        let args = self.stk.get_args(n).to_vec();

        let ty = match (ty, explicit) {
            (Some(ty), Some(elem)) => {
                for arg in args.iter() {
                    self.check_element(arg, &elem, "SliceLit")?;
                }
                ty
            }
            _ if n == 0 => Type::slice(Type::empty_interface()),
            _ => {
                let elem = self.bound_element_type(&args, 0, n, 1, "SliceLit")?;
                Type::slice(self.oracle.default_type(&elem))
            }
        };

        let elts = args.iter().map(|a| a.value.clone()).collect();
        self.push_composite(ty, elts, n);
        Ok(self)
    }

    /// Builds an array literal from `n` operands. An open `[...]T` type, or
    /// no type at all, takes its length from `n`.
    pub fn array_lit(&mut self, ty: Option<Type>, n: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "ArrayLit {} {}", display_opt(&ty), n);
        let explicit = match &ty {
            Some(t) => match t.underlying() {
                Type::Array(elem, len) => Some((*elem, len)),
                _ => return invalid_composite(t, "array", "ArrayLit"),
            },
            None => None,
        };
        if let Some((_, Some(len))) = explicit {
            if n > len {
                return MK_ERROR!(
                    ErrorImpl::ArityMismatch {
                        expected: len,
                        received: n
                    },
                    "ArrayLit"
                );
            }
        }
        self.check_args(n, "ArrayLit")?;
        let args = self.stk.get_args(n).to_vec();

        let (lit_ty, ty) = match (ty, explicit) {
            (Some(ty), Some((elem, len))) => {
                for arg in args.iter() {
                    self.check_element(arg, &elem, "ArrayLit")?;
                }
                if len.is_none() && matches!(ty, Type::Array(..)) {
                    (ty, Type::array(elem, Some(n)))
                } else {
                    (ty.clone(), ty)
                }
            }
            _ => {
                let elem = if n == 0 {
                    Type::empty_interface()
                } else {
                    let elem = self.bound_element_type(&args, 0, n, 1, "ArrayLit")?;
                    self.oracle.default_type(&elem)
                };
                let ty = Type::array(elem, Some(n));
                (ty.clone(), ty)
            }
        };

        let elts = args.iter().map(|a| a.value.clone()).collect();
        self.stk.ret(
            n,
            Operand::new(Expr::CompositeLit { ty: lit_ty, elts }, ty, OperandMode::Value),
        );
        Ok(self)
    }

    /// Builds a positional struct literal. `n` is zero or the number of fields.
    pub fn struct_lit(&mut self, ty: Type, n: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "StructLit {} {}", ty, n);
        let Type::Struct(st) = ty.underlying() else {
            return invalid_composite(&ty, "struct", "StructLit");
        };
        if n != 0 && n != st.fields.len() {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: st.fields.len(),
                    received: n
                },
                "StructLit"
            );
        }
        self.check_args(n, "StructLit")?;
        let args = self.stk.get_args(n).to_vec();

        for (arg, field) in args.iter().zip(st.fields.iter()) {
            self.check_element(arg, &field.ty, "StructLit")?;
        }

        let elts = args.iter().map(|a| a.value.clone()).collect();
        self.push_composite(ty, elts, n);
        Ok(self)
    }

    /// The common type of `args[start..end]`, taking every `step`th operand.
    ///
    /// Identical types give that type. Untyped numeric constants of
    /// different kinds give the largest kind, left for the caller to
    /// default. Anything else is a mismatch. A zero `step` or a range
    /// outside `args` is an arity mismatch.
    pub fn bound_element_type(
        &self,
        args: &[Operand],
        start: usize,
        end: usize,
        step: usize,
        operation: &'static str,
    ) -> Result<Type, Error> {
        if step == 0 {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: 1,
                    received: 0
                },
                operation
            );
        }
        if start > end || end > args.len() {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: end.max(start),
                    received: args.len()
                },
                operation
            );
        }

        let mut types = Vec::with_capacity((end - start) / step + 1);
        for arg in args[start..end].iter().step_by(step) {
            let ty = self.single_value(arg, operation)?;
            if ty == Type::Basic(BasicKind::UntypedNil) {
                return MK_ERROR!(ErrorImpl::UseOfUntypedNil, operation);
            }
            types.push(ty);
        }

        let Some(first) = types.first().cloned() else {
            return Ok(Type::empty_interface());
        };
        let Some(other) = types.iter().find(|t| **t != first) else {
            return Ok(first);
        };
        let mismatch = |second: &Type| {
            MK_ERROR!(
                ErrorImpl::MismatchedElementTypes {
                    first: first.to_string(),
                    second: second.to_string()
                },
                operation
            )
        };
        if !types.iter().all(Type::is_untyped) {
            return mismatch(other);
        }

        let mut bound = BasicKind::UntypedInt;
        for ty in types.iter() {
            let Type::Basic(kind) = ty else {
                return mismatch(ty);
            };
            match (kind.untyped_rank(), bound.untyped_rank()) {
                (Some(rank), Some(current)) if rank > current => bound = *kind,
                (Some(_), _) => (),
                (None, _) => return mismatch(other),
            }
        }
        Ok(Type::Basic(bound))
    }

    fn check_element(
        &self,
        arg: &Operand,
        target: &Type,
        operation: &'static str,
    ) -> Result<(), Error> {
        let ty = self.single_value(arg, operation)?;
        if !self.oracle.assignable(&ty, target) {
            return MK_ERROR!(
                ErrorImpl::NotAssignable {
                    value_type: ty.to_string(),
                    target_type: target.to_string()
                },
                operation
            );
        }
        Ok(())
    }

    fn push_composite(&mut self, ty: Type, elts: Vec<Expr>, n: usize) {
        let value = Expr::CompositeLit {
            ty: ty.clone(),
            elts,
        };
        self.stk.ret(n, Operand::new(value, ty, OperandMode::Value));
    }
}

fn invalid_composite<T>(ty: &Type, expected: &'static str, operation: &'static str) -> Result<T, Error> {
    MK_ERROR!(
        ErrorImpl::InvalidCompositeType {
            ty: ty.to_string(),
            expected
        },
        operation
    )
}

fn display_opt(ty: &Option<Type>) -> String {
    ty.as_ref().map(Type::to_string).unwrap_or_default()
}
